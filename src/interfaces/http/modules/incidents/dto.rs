//! Incident DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Incident;
use crate::interfaces::http::common::{default_limit, default_page};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDto {
    pub id: String,
    pub vehicle_id: String,
    pub reservation_id: Option<String>,
    pub reported_by: String,
    pub description: String,
    /// LOW, MEDIUM or HIGH
    pub severity: String,
    /// OPEN or RESOLVED
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Incident> for IncidentDto {
    fn from(i: Incident) -> Self {
        Self {
            id: i.id,
            vehicle_id: i.vehicle_id,
            reservation_id: i.reservation_id,
            reported_by: i.reported_by,
            description: i.description,
            severity: i.severity.as_str().to_string(),
            status: i.status.as_str().to_string(),
            created_at: i.created_at,
            resolved_at: i.resolved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[validate(length(min = 1, message = "vehicleId is required"))]
    pub vehicle_id: String,
    pub reservation_id: Option<String>,
    #[validate(length(min = 1, max = 4000, message = "description is required"))]
    pub description: String,
    /// Defaults to MEDIUM
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListIncidentsParams {
    pub status: Option<String>,
    pub vehicle_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
