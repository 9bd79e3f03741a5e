//! Dashboard handler

use axum::{extract::State, Extension, Json};

use super::dto::DashboardDto;
use crate::application::AppServices;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard widgets, each loaded or failed", body = ApiResponse<DashboardDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_dashboard(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<DashboardDto>>> {
    user.actor().require_admin()?;
    let dashboard = services.dashboard.load().await;
    Ok(Json(ApiResponse::success(DashboardDto::from(dashboard))))
}
