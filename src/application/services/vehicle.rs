//! Fleet management

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::application::Actor;
use crate::domain::handover::{PenaltyBreakdown, PenaltyInput, PenaltyPolicy};
use crate::domain::vehicle::{FuelType, Vehicle, VehicleFilter, VehicleStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

const MIN_YEAR: i32 = 1950;

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    pub fuel_type: FuelType,
    pub current_mileage: i64,
    pub location: Option<String>,
    /// Cents
    pub price_per_day: i64,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate_number: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub current_mileage: Option<i64>,
    pub location: Option<String>,
    pub price_per_day: Option<i64>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Clone)]
pub struct PenaltyRequest {
    pub current_mileage: i64,
    pub has_accident: bool,
    /// Rental the penalty applies to; one rental day when absent
    pub reservation_id: Option<String>,
}

pub struct VehicleService {
    repos: Arc<dyn RepositoryProvider>,
    penalty_policy: PenaltyPolicy,
}

fn validate_fields(year: i32, mileage: i64, price_per_day: i64) -> DomainResult<()> {
    let max_year = Utc::now().year() + 1;
    if !(MIN_YEAR..=max_year).contains(&year) {
        return Err(DomainError::Validation(format!(
            "year must be between {} and {}",
            MIN_YEAR, max_year
        )));
    }
    if mileage < 0 {
        return Err(DomainError::Validation("current_mileage must not be negative".into()));
    }
    if price_per_day <= 0 {
        return Err(DomainError::Validation("price_per_day must be positive".into()));
    }
    Ok(())
}

impl VehicleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, penalty_policy: PenaltyPolicy) -> Self {
        Self {
            repos,
            penalty_policy,
        }
    }

    pub async fn get(&self, id: &str) -> DomainResult<Vehicle> {
        self.repos
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", id))
    }

    pub async fn list(
        &self,
        filter: &VehicleFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Vehicle>> {
        filter.validate()?;
        self.repos.vehicles().list(filter, params).await
    }

    async fn ensure_plate_free(&self, plate: &str, except_id: Option<&str>) -> DomainResult<()> {
        if let Some(existing) = self.repos.vehicles().find_by_plate(plate).await? {
            if Some(existing.id.as_str()) != except_id {
                return Err(DomainError::Conflict(format!(
                    "Plate number {} is already registered",
                    existing.plate_number
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, actor: &Actor, input: NewVehicle) -> DomainResult<Vehicle> {
        actor.require_admin()?;
        if input.brand.trim().is_empty()
            || input.model.trim().is_empty()
            || input.plate_number.trim().is_empty()
        {
            return Err(DomainError::Validation(
                "brand, model and plate_number are required".into(),
            ));
        }
        validate_fields(input.year, input.current_mileage, input.price_per_day)?;

        let vehicle = Vehicle::new(
            input.brand.trim(),
            input.model.trim(),
            input.year,
            input.plate_number,
            input.fuel_type,
            input.current_mileage,
            input.location,
            input.price_per_day,
        );
        self.ensure_plate_free(&vehicle.plate_number, None).await?;
        self.repos.vehicles().save(vehicle.clone()).await?;

        info!(vehicle_id = %vehicle.id, plate = %vehicle.plate_number, "🚙 Vehicle added to fleet");
        Ok(vehicle)
    }

    pub async fn update(&self, actor: &Actor, id: &str, changes: VehicleChanges) -> DomainResult<Vehicle> {
        actor.require_admin()?;
        let mut vehicle = self.get(id).await?;

        if let Some(brand) = changes.brand {
            vehicle.brand = brand.trim().to_string();
        }
        if let Some(model) = changes.model {
            vehicle.model = model.trim().to_string();
        }
        if let Some(year) = changes.year {
            vehicle.year = year;
        }
        if let Some(plate) = changes.plate_number {
            let plate = plate.trim().to_uppercase();
            self.ensure_plate_free(&plate, Some(&vehicle.id)).await?;
            vehicle.plate_number = plate;
        }
        if let Some(fuel) = changes.fuel_type {
            vehicle.fuel_type = fuel;
        }
        if let Some(mileage) = changes.current_mileage {
            if mileage < vehicle.current_mileage {
                return Err(DomainError::Validation(format!(
                    "current_mileage cannot go back from {} to {}",
                    vehicle.current_mileage, mileage
                )));
            }
            vehicle.record_mileage(mileage);
        }
        if changes.location.is_some() {
            vehicle.location = changes.location;
        }
        if let Some(price) = changes.price_per_day {
            vehicle.price_per_day = price;
        }
        if vehicle.brand.is_empty() || vehicle.model.is_empty() || vehicle.plate_number.is_empty() {
            return Err(DomainError::Validation(
                "brand, model and plate_number must not be empty".into(),
            ));
        }
        validate_fields(vehicle.year, vehicle.current_mileage, vehicle.price_per_day)?;
        if let Some(status) = changes.status {
            vehicle.set_status(status);
        }
        vehicle.updated_at = Utc::now();

        self.repos.vehicles().update(vehicle.clone()).await?;
        info!(vehicle_id = %vehicle.id, status = %vehicle.status, "Vehicle updated");
        Ok(vehicle)
    }

    /// Vehicles with reservation history cannot be deleted.
    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;
        self.get(id).await?;
        self.repos.vehicles().delete(id).await?;
        warn!(vehicle_id = %id, "Vehicle removed from fleet");
        Ok(())
    }

    pub async fn calculate_penalty(
        &self,
        vehicle_id: &str,
        request: PenaltyRequest,
    ) -> DomainResult<PenaltyBreakdown> {
        let vehicle = self.get(vehicle_id).await?;
        let rental_days = match request.reservation_id.as_deref() {
            Some(reservation_id) => {
                let reservation = self
                    .repos
                    .reservations()
                    .find_by_id(reservation_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;
                if reservation.vehicle_id != vehicle.id {
                    return Err(DomainError::Validation(format!(
                        "Reservation {} is not for vehicle {}",
                        reservation_id, vehicle.id
                    )));
                }
                reservation.rental_days()
            }
            None => 1,
        };

        self.penalty_policy.compute(PenaltyInput {
            start_mileage: vehicle.current_mileage,
            end_mileage: request.current_mileage,
            rental_days,
            has_accident: request.has_accident,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::user::UserRole;

    fn new_vehicle(plate: &str) -> NewVehicle {
        NewVehicle {
            brand: "Renault".into(),
            model: "Clio".into(),
            year: 2021,
            plate_number: plate.into(),
            fuel_type: FuelType::Diesel,
            current_mileage: 30_000,
            location: Some("Paris".into()),
            price_per_day: 3900,
        }
    }

    async fn setup() -> (Arc<dyn RepositoryProvider>, VehicleService, Actor) {
        let repos = testing::repos().await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        (repos.clone(), VehicleService::new(repos, PenaltyPolicy::default()), admin)
    }

    #[tokio::test]
    async fn plates_are_unique_case_insensitively() {
        let (_repos, service, admin) = setup().await;
        let v = service.create(&admin, new_vehicle("ab-123-cd")).await.unwrap();
        assert_eq!(v.plate_number, "AB-123-CD");
        assert!(matches!(
            service.create(&admin, new_vehicle("AB-123-CD")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn writes_are_admin_only() {
        let (repos, service, _admin) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        assert!(matches!(
            service.create(&customer, new_vehicle("ZZ-1")).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected() {
        let (_repos, service, admin) = setup().await;
        let mut input = new_vehicle("XX-1");
        input.year = 1900;
        assert!(matches!(
            service.create(&admin, input).await,
            Err(DomainError::Validation(_))
        ));
        let mut input = new_vehicle("XX-2");
        input.price_per_day = 0;
        assert!(matches!(
            service.create(&admin, input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_mileage_monotonic() {
        let (_repos, service, admin) = setup().await;
        let v = service.create(&admin, new_vehicle("MM-1")).await.unwrap();
        let err = service
            .update(
                &admin,
                &v.id,
                VehicleChanges {
                    current_mileage: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let updated = service
            .update(
                &admin,
                &v.id,
                VehicleChanges {
                    current_mileage: Some(31_000),
                    status: Some(VehicleStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.current_mileage, 31_000);
        assert_eq!(updated.status, VehicleStatus::Maintenance);
    }

    #[tokio::test]
    async fn penalty_uses_reservation_days() {
        let (repos, service, _admin) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let reservation = testing::reservation(&repos, &vehicle, &customer, 1, 3).await;

        let without = service
            .calculate_penalty(
                &vehicle.id,
                PenaltyRequest {
                    current_mileage: vehicle.current_mileage + 700,
                    has_accident: false,
                    reservation_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(without.excess_km, 500);
        assert_eq!(without.total, 500 * 25);

        let with = service
            .calculate_penalty(
                &vehicle.id,
                PenaltyRequest {
                    current_mileage: vehicle.current_mileage + 700,
                    has_accident: true,
                    reservation_id: Some(reservation.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(with.included_km, 600);
        assert_eq!(with.total, 100 * 25 + 50_000);
    }

    #[tokio::test]
    async fn delete_unknown_vehicle_is_not_found() {
        let (_repos, service, admin) = setup().await;
        assert!(matches!(
            service.delete(&admin, "nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
