//! Reservation API handlers
//!
//! Booking, availability checks and the status lifecycle. Every status
//! change goes through the reservation state machine; illegal moves are 409.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    AvailabilityDto, CheckAvailabilityRequest, CreateReservationRequest, ListReservationsParams,
    ReservationDto, ReservationStatsDto, UpdateReservationRequest, UpdateStatusRequest,
};
use crate::application::{AppServices, NewReservation, ReservationChanges};
use crate::domain::reservation::{AvailabilityQuery, ReservationFilter};
use crate::domain::ReservationStatus;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/v1/reservations/check-availability",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CheckAvailabilityRequest,
    responses(
        (status = 200, description = "Availability of the vehicle for the window", body = ApiResponse<AvailabilityDto>),
        (status = 404, description = "Unknown vehicle"),
        (status = 422, description = "End is not after start")
    )
)]
pub async fn check_availability(
    State(services): State<AppServices>,
    ValidatedJson(request): ValidatedJson<CheckAvailabilityRequest>,
) -> ApiResult<Json<ApiResponse<AvailabilityDto>>> {
    let query = AvailabilityQuery {
        vehicle_id: request.vehicle_id,
        start: request.start_datetime,
        end: request.end_datetime,
        exclude_reservation_id: request.exclude_reservation_id,
    };
    let availability = services.reservations.check_availability(&query).await?;
    Ok(Json(ApiResponse::success(AvailabilityDto::from(availability))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created as PENDING", body = ApiResponse<ReservationDto>),
        (status = 409, description = "Vehicle not available for the window"),
        (status = 422, description = "Invalid window")
    )
)]
pub async fn create_reservation(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let input = NewReservation {
        vehicle_id: request.vehicle_id,
        start_datetime: request.start_datetime,
        end_datetime: request.end_datetime,
        pickup_location: request.pickup_location,
        dropoff_location: request.dropoff_location,
        car_sitting_option: request.car_sitting_option,
        customer_id: request.customer_id,
    };
    let reservation = services.reservations.create(&user.actor(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(reservation))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Reservations visible to the caller", body = ApiResponse<PaginatedResponse<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListReservationsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ReservationDto>>>> {
    let filter = ReservationFilter {
        status: parse_opt(params.status.as_deref())?,
        vehicle_id: params.vehicle_id,
        customer_id: params.customer_id,
    };
    let page = services
        .reservations
        .list(&user.actor(), filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        ReservationDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/stats",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts by status, upcoming and revenue", body = ApiResponse<ReservationStatsDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn reservation_stats(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<ReservationStatsDto>>> {
    user.actor().require_admin()?;
    let stats = services.reservations.stats().await?;
    Ok(Json(ApiResponse::success(ReservationStatsDto::from(stats))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not your reservation"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let reservation = services.reservations.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 409, description = "Not PENDING, or new window unavailable")
    )
)]
pub async fn update_reservation(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let changes = ReservationChanges {
        start_datetime: request.start_datetime,
        end_datetime: request.end_datetime,
        pickup_location: request.pickup_location,
        dropoff_location: request.dropoff_location,
        car_sitting_option: request.car_sitting_option,
    };
    let reservation = services
        .reservations
        .update(&user.actor(), &id, changes)
        .await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}/status",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_reservation_status(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let next: ReservationStatus = request.status.parse()?;
    let reservation = services
        .reservations
        .update_status(&user.actor(), &id, next)
        .await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 409, description = "Only PENDING reservations can be cancelled")
    )
)]
pub async fn cancel_reservation(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let reservation = services.reservations.cancel(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Reservation is still active")
    )
)]
pub async fn delete_reservation(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    services.reservations.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
