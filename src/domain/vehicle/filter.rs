//! Fleet listing filter
//!
//! Every populated field narrows the result; fields combine with AND. The
//! same predicate is evaluated in SQL by the repository and in memory by
//! [`VehicleFilter::matches`] on the client side.

use super::model::{FuelType, Vehicle, VehicleStatus};
use crate::shared::errors::DomainError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    /// Case-insensitive substring of brand, model or plate number
    pub search: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub status: Option<VehicleStatus>,
    /// Exact brand, case-insensitive
    pub brand: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub mileage_min: Option<i64>,
    pub mileage_max: Option<i64>,
}

impl VehicleFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject inverted ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if let (Some(min), Some(max)) = (self.year_min, self.year_max) {
            if min > max {
                return Err(DomainError::Validation(format!(
                    "year_min ({}) is greater than year_max ({})",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.mileage_min, self.mileage_max) {
            if min > max {
                return Err(DomainError::Validation(format!(
                    "mileage_min ({}) is greater than mileage_max ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Normalized search term, `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(term) = self.search_term() {
            let hit = vehicle.brand.to_lowercase().contains(&term)
                || vehicle.model.to_lowercase().contains(&term)
                || vehicle.plate_number.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(fuel) = self.fuel_type {
            if vehicle.fuel_type != fuel {
                return false;
            }
        }
        if let Some(status) = self.status {
            if vehicle.status != status {
                return false;
            }
        }
        if let Some(brand) = self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            if !vehicle.brand.eq_ignore_ascii_case(brand) {
                return false;
            }
        }
        if self.year_min.is_some_and(|min| vehicle.year < min) {
            return false;
        }
        if self.year_max.is_some_and(|max| vehicle.year > max) {
            return false;
        }
        if self.mileage_min.is_some_and(|min| vehicle.current_mileage < min) {
            return false;
        }
        if self.mileage_max.is_some_and(|max| vehicle.current_mileage > max) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, vehicles: &'a [Vehicle]) -> Vec<&'a Vehicle> {
        vehicles.iter().filter(|v| self.matches(v)).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new("Tesla", "Model 3", 2021, "EV-001", FuelType::Electric, 30_000, None, 9000),
            Vehicle::new("Tesla", "Model Y", 2023, "EV-002", FuelType::Electric, 5_000, None, 11000),
            Vehicle::new("Renault", "Clio", 2019, "RC-100", FuelType::Diesel, 80_000, None, 3500),
            Vehicle::new("Toyota", "Yaris", 2022, "TY-200", FuelType::Hybrid, 20_000, None, 4000),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = VehicleFilter::default();
        assert!(f.is_empty());
        assert_eq!(f.apply(&fleet()).len(), 4);
    }

    #[test]
    fn filters_compose_with_and() {
        let f = VehicleFilter {
            fuel_type: Some(FuelType::Electric),
            year_min: Some(2022),
            ..Default::default()
        };
        let fleet = fleet();
        let hits = f.apply(&fleet);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].model, "Model Y");

        // Adding a contradicting criterion empties the result
        let f = VehicleFilter {
            brand: Some("renault".into()),
            ..f
        };
        assert!(f.apply(&fleet).is_empty());
    }

    #[test]
    fn search_covers_brand_model_and_plate() {
        let fleet = fleet();
        let by_model = VehicleFilter {
            search: Some("yar".into()),
            ..Default::default()
        };
        assert_eq!(by_model.apply(&fleet).len(), 1);

        let by_plate = VehicleFilter {
            search: Some("ev-".into()),
            ..Default::default()
        };
        assert_eq!(by_plate.apply(&fleet).len(), 2);

        let blank = VehicleFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.apply(&fleet).len(), 4);
    }

    #[test]
    fn mileage_range_is_inclusive() {
        let f = VehicleFilter {
            mileage_min: Some(20_000),
            mileage_max: Some(30_000),
            ..Default::default()
        };
        assert_eq!(f.apply(&fleet()).len(), 2);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let f = VehicleFilter {
            year_min: Some(2024),
            year_max: Some(2020),
            ..Default::default()
        };
        assert!(matches!(f.validate(), Err(DomainError::Validation(_))));
    }
}
