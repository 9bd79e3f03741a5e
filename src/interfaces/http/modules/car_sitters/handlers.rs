//! Car-sitter API handlers
//!
//! Customers request pickups and dropoffs; the assigned car sitter (or an
//! admin) validates or rejects each request exactly once.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateHandoverRequest, HandoverDto, ListHandoversParams, ValidateDropoffRequest,
    ValidatePickupRequest,
};
use crate::application::{AppServices, NewHandover, ValidateDropoff, ValidatePickup};
use crate::domain::handover::{HandoverFilter, HandoverKind};
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::decimal_to_cents;

impl From<CreateHandoverRequest> for NewHandover {
    fn from(r: CreateHandoverRequest) -> Self {
        Self {
            reservation_id: r.reservation_id,
            car_sitter_id: r.car_sitter_id,
            scheduled_at: r.scheduled_at,
            location: r.location,
            notes: r.notes,
        }
    }
}

async fn list_requests(
    services: &AppServices,
    user: &AuthenticatedUser,
    kind: HandoverKind,
    params: ListHandoversParams,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<HandoverDto>>>> {
    let filter = HandoverFilter {
        status: parse_opt(params.status.as_deref())?,
        reservation_id: params.reservation_id,
        ..HandoverFilter::default()
    };
    let page = services
        .car_sitters
        .list_requests(&user.actor(), kind, filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        HandoverDto::from,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/car-sitters/pickup-requests",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    request_body = CreateHandoverRequest,
    responses(
        (status = 201, description = "Pickup requested, reservation PICKUP_REQUESTED", body = ApiResponse<HandoverDto>),
        (status = 409, description = "Reservation is not CONFIRMED")
    )
)]
pub async fn create_pickup_request(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateHandoverRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HandoverDto>>)> {
    let created = services
        .car_sitters
        .create_pickup(&user.actor(), request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(HandoverDto::from(created))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/car-sitters/pickup-requests",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    params(ListHandoversParams),
    responses(
        (status = 200, description = "Pickup requests visible to the caller", body = ApiResponse<PaginatedResponse<HandoverDto>>)
    )
)]
pub async fn list_pickup_requests(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListHandoversParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<HandoverDto>>>> {
    list_requests(&services, &user, HandoverKind::Pickup, params).await
}

#[utoipa::path(
    post,
    path = "/api/v1/car-sitters/dropoff-requests",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    request_body = CreateHandoverRequest,
    responses(
        (status = 201, description = "Dropoff requested", body = ApiResponse<HandoverDto>),
        (status = 409, description = "Reservation is not PICKED_UP or a dropoff is already pending")
    )
)]
pub async fn create_dropoff_request(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateHandoverRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HandoverDto>>)> {
    let created = services
        .car_sitters
        .create_dropoff(&user.actor(), request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(HandoverDto::from(created))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/car-sitters/dropoff-requests",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    params(ListHandoversParams),
    responses(
        (status = 200, description = "Dropoff requests visible to the caller", body = ApiResponse<PaginatedResponse<HandoverDto>>)
    )
)]
pub async fn list_dropoff_requests(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListHandoversParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<HandoverDto>>>> {
    list_requests(&services, &user, HandoverKind::Dropoff, params).await
}

#[utoipa::path(
    post,
    path = "/api/v1/car-sitters/validate-pickup",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    request_body = ValidatePickupRequest,
    responses(
        (status = 200, description = "Pickup decided", body = ApiResponse<HandoverDto>),
        (status = 403, description = "Not the assigned car sitter"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn validate_pickup(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ValidatePickupRequest>,
) -> ApiResult<Json<ApiResponse<HandoverDto>>> {
    let decided = services
        .car_sitters
        .validate_pickup(
            &user.actor(),
            ValidatePickup {
                request_id: request.request_id,
                is_validated: request.is_validated,
                notes: request.notes,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(HandoverDto::from(decided))))
}

#[utoipa::path(
    post,
    path = "/api/v1/car-sitters/validate-dropoff",
    tag = "Car Sitters",
    security(("bearer_auth" = [])),
    request_body = ValidateDropoffRequest,
    responses(
        (status = 200, description = "Dropoff decided", body = ApiResponse<HandoverDto>),
        (status = 403, description = "Not the assigned car sitter"),
        (status = 409, description = "Request already decided"),
        (status = 422, description = "Mileage missing or below the recorded value")
    )
)]
pub async fn validate_dropoff(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ValidateDropoffRequest>,
) -> ApiResult<Json<ApiResponse<HandoverDto>>> {
    let input = ValidateDropoff {
        request_id: request.request_id,
        is_validated: request.is_validated,
        notes: request.notes,
        current_mileage: request.current_mileage,
        has_accident: request.has_accident,
        penalty_amount: request.penalty_amount.map(decimal_to_cents).transpose()?,
    };
    let decided = services
        .car_sitters
        .validate_dropoff(&user.actor(), input)
        .await?;
    Ok(Json(ApiResponse::success(HandoverDto::from(decided))))
}
