//! Vehicle API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CalculatePenaltyRequest, CreateVehicleRequest, ListVehiclesParams, PenaltyDto,
    UpdateVehicleRequest, VehicleDto,
};
use crate::application::{AppServices, NewVehicle, PenaltyRequest, VehicleChanges};
use crate::domain::VehicleFilter;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::decimal_to_cents;

impl ListVehiclesParams {
    fn filter(&self) -> ApiResult<VehicleFilter> {
        Ok(VehicleFilter {
            search: self.search.clone(),
            fuel_type: parse_opt(self.fuel_type.as_deref())?,
            status: parse_opt(self.status.as_deref())?,
            brand: self.brand.clone().filter(|b| !b.trim().is_empty()),
            year_min: self.year_min,
            year_max: self.year_max,
            mileage_min: self.mileage_min,
            mileage_max: self.mileage_max,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(ListVehiclesParams),
    responses(
        (status = 200, description = "Vehicles matching every given filter", body = ApiResponse<PaginatedResponse<VehicleDto>>),
        (status = 422, description = "Unknown enum value or inverted range")
    )
)]
pub async fn list_vehicles(
    State(services): State<AppServices>,
    Query(params): Query<ListVehiclesParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<VehicleDto>>>> {
    let filter = params.filter()?;
    let page = services
        .vehicles
        .list(&filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        VehicleDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vehicle(
    State(services): State<AppServices>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<VehicleDto>>> {
    let vehicle = services.vehicles.get(&id).await?;
    Ok(Json(ApiResponse::success(VehicleDto::from(vehicle))))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Plate number already registered")
    )
)]
pub async fn create_vehicle(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<VehicleDto>>)> {
    let input = NewVehicle {
        brand: request.brand,
        model: request.model,
        year: request.year,
        plate_number: request.plate_number,
        fuel_type: request.fuel_type.parse()?,
        current_mileage: request.current_mileage,
        location: request.location,
        price_per_day: decimal_to_cents(request.price_per_day)?,
    };
    let vehicle = services.vehicles.create(&user.actor(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VehicleDto::from(vehicle))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_vehicle(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<Json<ApiResponse<VehicleDto>>> {
    let changes = VehicleChanges {
        brand: request.brand,
        model: request.model,
        year: request.year,
        plate_number: request.plate_number,
        fuel_type: parse_opt(request.fuel_type.as_deref())?,
        current_mileage: request.current_mileage,
        location: request.location,
        price_per_day: request.price_per_day.map(decimal_to_cents).transpose()?,
        status: parse_opt(request.status.as_deref())?,
    };
    let vehicle = services.vehicles.update(&user.actor(), &id, changes).await?;
    Ok(Json(ApiResponse::success(VehicleDto::from(vehicle))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Vehicle has reservations")
    )
)]
pub async fn delete_vehicle(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    services.vehicles.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/calculate-penalty",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = CalculatePenaltyRequest,
    responses(
        (status = 200, description = "Penalty breakdown", body = ApiResponse<PenaltyDto>),
        (status = 422, description = "Mileage below the recorded value")
    )
)]
pub async fn calculate_penalty(
    State(services): State<AppServices>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CalculatePenaltyRequest>,
) -> ApiResult<Json<ApiResponse<PenaltyDto>>> {
    let breakdown = services
        .vehicles
        .calculate_penalty(
            &id,
            PenaltyRequest {
                current_mileage: request.current_mileage,
                has_accident: request.has_accident,
                reservation_id: request.reservation_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(PenaltyDto::from(breakdown))))
}
