//! Vehicle DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{PenaltyBreakdown, Vehicle};
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::cents_to_decimal;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    /// PETROL, DIESEL, ELECTRIC or HYBRID
    pub fuel_type: String,
    pub current_mileage: i64,
    /// AVAILABLE, RESERVED, RENTED, MAINTENANCE or INCIDENT
    pub status: String,
    pub location: Option<String>,
    #[schema(value_type = String, example = "45.00")]
    pub price_per_day: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            brand: v.brand,
            model: v.model,
            year: v.year,
            plate_number: v.plate_number,
            fuel_type: v.fuel_type.as_str().to_string(),
            current_mileage: v.current_mileage,
            status: v.status.as_str().to_string(),
            location: v.location,
            price_per_day: cents_to_decimal(v.price_per_day),
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 64, message = "brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, max = 64, message = "model is required"))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 20, message = "plateNumber is required"))]
    pub plate_number: String,
    pub fuel_type: String,
    #[validate(range(min = 0))]
    pub current_mileage: i64,
    pub location: Option<String>,
    #[schema(value_type = String, example = "45.00")]
    pub price_per_day: Decimal,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 64))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: Option<String>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price_per_day: Option<Decimal>,
    pub status: Option<String>,
}

/// Fleet listing filters; all given filters must match
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListVehiclesParams {
    /// Substring of brand, model or plate number
    pub search: Option<String>,
    pub fuel_type: Option<String>,
    pub status: Option<String>,
    pub brand: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub mileage_min: Option<i64>,
    pub mileage_max: Option<i64>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePenaltyRequest {
    #[validate(range(min = 0))]
    pub current_mileage: i64,
    #[serde(default)]
    pub has_accident: bool,
    /// Reservation the vehicle is returned from; sets the rental days
    pub reservation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyDto {
    pub driven_km: i64,
    pub included_km: i64,
    pub excess_km: i64,
    #[schema(value_type = String)]
    pub mileage_penalty: Decimal,
    #[schema(value_type = String)]
    pub accident_fee: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

impl From<PenaltyBreakdown> for PenaltyDto {
    fn from(p: PenaltyBreakdown) -> Self {
        Self {
            driven_km: p.driven_km,
            included_km: p.included_km,
            excess_km: p.excess_km,
            mileage_penalty: cents_to_decimal(p.mileage_penalty),
            accident_fee: cents_to_decimal(p.accident_fee),
            total: cents_to_decimal(p.total),
        }
    }
}
