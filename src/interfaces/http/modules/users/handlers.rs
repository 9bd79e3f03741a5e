//! User management API handlers
//!
//! Admin CRUD over accounts. Users may read and edit their own record.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateUserRequest, ListUsersParams, UpdateUserRequest, UserDto};
use crate::application::{AppServices, RegisterUser, UserChanges};
use crate::domain::UserRole;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserDto>>>> {
    let role: Option<UserRole> = parse_opt(params.role.as_deref())?;
    let page = services
        .users
        .list(&user.actor(), role, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        UserDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let found = services.users.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(found))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let role: UserRole = parse_opt(request.role.as_deref())?.unwrap_or_default();
    let input = RegisterUser {
        email: request.email,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    };
    let created = services.users.create_user(&user.actor(), input, role).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let changes = UserChanges {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        role: parse_opt(request.role.as_deref())?,
        is_active: request.is_active,
    };
    let updated = services.users.update(&user.actor(), &id, changes).await?;
    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let deactivated = services.users.deactivate(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(deactivated))))
}

#[utoipa::path(
    get,
    path = "/api/v1/car-sitters",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Active car sitters", body = ApiResponse<PaginatedResponse<UserDto>>)
    )
)]
pub async fn list_car_sitters(
    State(services): State<AppServices>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserDto>>>> {
    let page = services
        .car_sitters
        .list_car_sitters(page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        UserDto::from,
    ))))
}
