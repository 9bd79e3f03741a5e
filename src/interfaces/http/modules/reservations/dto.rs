//! Reservation DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::ReservationStats;
use crate::domain::{Availability, Reservation};
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::cents_to_decimal;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: String,
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub car_sitting_option: bool,
    /// PENDING, CONFIRMED, PICKUP_REQUESTED, PICKED_UP, CANCELLED or COMPLETED
    pub status: String,
    #[schema(value_type = Option<String>, example = "135.00")]
    pub total_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            vehicle_id: r.vehicle_id,
            customer_id: r.customer_id,
            start_datetime: r.start_datetime,
            end_datetime: r.end_datetime,
            pickup_location: r.pickup_location,
            dropoff_location: r.dropoff_location,
            car_sitting_option: r.car_sitting_option,
            status: r.status.as_str().to_string(),
            total_price: r.total_price.map(cents_to_decimal),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "vehicleId is required"))]
    pub vehicle_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "pickupLocation is required"))]
    pub pickup_location: String,
    #[validate(length(min = 1, max = 255, message = "dropoffLocation is required"))]
    pub dropoff_location: String,
    #[serde(default)]
    pub car_sitting_option: bool,
    /// Admins may book on behalf of a customer
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 255))]
    pub pickup_location: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub dropoff_location: Option<String>,
    pub car_sitting_option: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    #[validate(length(min = 1, message = "vehicleId is required"))]
    pub vehicle_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    /// Reservation being edited; it never conflicts with itself
    pub exclude_reservation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub is_available: bool,
    pub conflicts: Vec<ReservationDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        Self {
            is_available: a.is_available,
            conflicts: a.conflicts.into_iter().map(ReservationDto::from).collect(),
            message: a.message,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListReservationsParams {
    pub status: Option<String>,
    pub vehicle_id: Option<String>,
    /// Ignored for customers, who only see their own reservations
    pub customer_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStatsDto {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    /// Blocking reservations that have not started yet
    pub upcoming: u64,
    /// Sum of paid invoices
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

impl From<ReservationStats> for ReservationStatsDto {
    fn from(s: ReservationStats) -> Self {
        Self {
            total: s.total,
            by_status: s.by_status,
            upcoming: s.upcoming,
            revenue: cents_to_decimal(s.revenue_cents),
        }
    }
}
