//! Incident API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateIncidentRequest, IncidentDto, ListIncidentsParams};
use crate::application::{AppServices, NewIncident};
use crate::domain::incident::IncidentFilter;
use crate::domain::IncidentSeverity;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/v1/incidents",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident opened, vehicle set to INCIDENT", body = ApiResponse<IncidentDto>),
        (status = 404, description = "Unknown vehicle")
    )
)]
pub async fn create_incident(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateIncidentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IncidentDto>>)> {
    let severity = parse_opt(request.severity.as_deref())?.unwrap_or(IncidentSeverity::Medium);
    let incident = services
        .incidents
        .create(
            &user.actor(),
            NewIncident {
                vehicle_id: request.vehicle_id,
                reservation_id: request.reservation_id,
                description: request.description,
                severity,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(IncidentDto::from(incident))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/incidents",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    params(ListIncidentsParams),
    responses(
        (status = 200, description = "Incidents", body = ApiResponse<PaginatedResponse<IncidentDto>>),
        (status = 403, description = "Customers cannot list incidents")
    )
)]
pub async fn list_incidents(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListIncidentsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<IncidentDto>>>> {
    let actor = user.actor();
    if !actor.is_car_sitter() {
        actor.require_admin()?;
    }
    let filter = IncidentFilter {
        status: parse_opt(params.status.as_deref())?,
        vehicle_id: params.vehicle_id,
    };
    let page = services
        .incidents
        .list(&filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        IncidentDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/incidents/{id}",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Incident", body = ApiResponse<IncidentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_incident(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IncidentDto>>> {
    let incident = services.incidents.get(&id).await?;
    let actor = user.actor();
    if !actor.is_car_sitter() {
        actor.require_owner_or_admin(&incident.reported_by, "incident")?;
    }
    Ok(Json(ApiResponse::success(IncidentDto::from(incident))))
}

#[utoipa::path(
    post,
    path = "/api/v1/incidents/{id}/resolve",
    tag = "Incidents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Incident resolved", body = ApiResponse<IncidentDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Already resolved")
    )
)]
pub async fn resolve_incident(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IncidentDto>>> {
    let incident = services.incidents.resolve(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(IncidentDto::from(incident))))
}
