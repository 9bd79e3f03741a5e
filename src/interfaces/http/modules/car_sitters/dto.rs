//! Car-sitter handover DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::HandoverRequest;
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::cents_to_decimal;

/// A pickup or dropoff request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandoverDto {
    pub id: String,
    /// PICKUP or DROPOFF
    pub kind: String,
    pub reservation_id: String,
    pub car_sitter_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    /// PENDING, VALIDATED or REJECTED
    pub status: String,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>)]
    pub penalty_amount: Option<Decimal>,
    pub current_mileage: Option<i64>,
    pub has_accident: bool,
    pub created_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl From<HandoverRequest> for HandoverDto {
    fn from(h: HandoverRequest) -> Self {
        Self {
            id: h.id,
            kind: h.kind.as_str().to_string(),
            reservation_id: h.reservation_id,
            car_sitter_id: h.car_sitter_id,
            scheduled_at: h.scheduled_at,
            location: h.location,
            status: h.status.as_str().to_string(),
            notes: h.notes,
            penalty_amount: h.penalty_amount.map(cents_to_decimal),
            current_mileage: h.current_mileage,
            has_accident: h.has_accident,
            created_at: h.created_at,
            validated_at: h.validated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHandoverRequest {
    #[validate(length(min = 1, message = "reservationId is required"))]
    pub reservation_id: String,
    #[validate(length(min = 1, message = "carSitterId is required"))]
    pub car_sitter_id: String,
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "location is required"))]
    pub location: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePickupRequest {
    #[validate(length(min = 1, message = "requestId is required"))]
    pub request_id: String,
    pub is_validated: bool,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDropoffRequest {
    #[validate(length(min = 1, message = "requestId is required"))]
    pub request_id: String,
    pub is_validated: bool,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    /// Required when validating
    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
    #[serde(default)]
    pub has_accident: bool,
    /// Overrides the computed penalty
    #[schema(value_type = Option<String>)]
    pub penalty_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListHandoversParams {
    /// PENDING, VALIDATED or REJECTED
    pub status: Option<String>,
    /// Required for customers
    pub reservation_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
