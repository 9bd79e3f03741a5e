//! Vehicle domain entity

use chrono::{DateTime, Utc};

str_enum! {
    /// Fleet status of a vehicle
    pub enum VehicleStatus {
        Available => "AVAILABLE",
        /// Paid reservation waiting for pickup
        Reserved => "RESERVED",
        /// Currently with a customer
        Rented => "RENTED",
        Maintenance => "MAINTENANCE",
        /// Blocked after an accident until the incident is resolved
        Incident => "INCIDENT",
    }
}

impl VehicleStatus {
    /// Whether the vehicle can take new bookings at all
    pub fn is_bookable(&self) -> bool {
        !matches!(self, Self::Maintenance | Self::Incident)
    }
}

str_enum! {
    pub enum FuelType {
        Petrol => "PETROL",
        Diesel => "DIESEL",
        Electric => "ELECTRIC",
        Hybrid => "HYBRID",
    }
}

/// A rentable car
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Unique registration plate
    pub plate_number: String,
    pub fuel_type: FuelType,
    /// Odometer reading in km
    pub current_mileage: i64,
    pub status: VehicleStatus,
    pub location: Option<String>,
    /// Daily rate in cents
    pub price_per_day: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        plate_number: impl Into<String>,
        fuel_type: FuelType,
        current_mileage: i64,
        location: Option<String>,
        price_per_day: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            brand: brand.into(),
            model: model.into(),
            year,
            plate_number: plate_number.into().trim().to_uppercase(),
            fuel_type,
            current_mileage,
            status: VehicleStatus::Available,
            location,
            price_per_day,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.plate_number)
    }

    pub fn set_status(&mut self, status: VehicleStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Record a new odometer reading. Readings never go backwards.
    pub fn record_mileage(&mut self, mileage: i64) {
        if mileage > self.current_mileage {
            self.current_mileage = mileage;
            self.updated_at = Utc::now();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vehicle {
        Vehicle::new("Peugeot", "208", 2022, " ab-123-cd ", FuelType::Petrol, 15_000, None, 4500)
    }

    #[test]
    fn new_vehicle_is_available_with_normalized_plate() {
        let v = sample();
        assert_eq!(v.status, VehicleStatus::Available);
        assert_eq!(v.plate_number, "AB-123-CD");
        assert_eq!(v.display_name(), "Peugeot 208 (AB-123-CD)");
    }

    #[test]
    fn maintenance_and_incident_are_not_bookable() {
        assert!(VehicleStatus::Available.is_bookable());
        assert!(VehicleStatus::Reserved.is_bookable());
        assert!(!VehicleStatus::Maintenance.is_bookable());
        assert!(!VehicleStatus::Incident.is_bookable());
    }

    #[test]
    fn mileage_never_decreases() {
        let mut v = sample();
        v.record_mileage(16_000);
        assert_eq!(v.current_mileage, 16_000);
        v.record_mileage(10);
        assert_eq!(v.current_mileage, 16_000);
    }
}
