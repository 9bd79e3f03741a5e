//! Incident reporting

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::Actor;
use crate::domain::incident::{Incident, IncidentFilter, IncidentSeverity};
use crate::domain::vehicle::VehicleStatus;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub vehicle_id: String,
    pub reservation_id: Option<String>,
    pub description: String,
    pub severity: IncidentSeverity,
}

pub struct IncidentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl IncidentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Report an incident; the vehicle is taken out of service.
    pub async fn create(&self, actor: &Actor, input: NewIncident) -> DomainResult<Incident> {
        if input.description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".into()));
        }
        let mut vehicle = self
            .repos
            .vehicles()
            .find_by_id(&input.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", input.vehicle_id.as_str()))?;

        if let Some(reservation_id) = input.reservation_id.as_deref() {
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
            if !actor.is_car_sitter() {
                actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
            }
        } else if !actor.is_admin() && !actor.is_car_sitter() {
            return Err(DomainError::Forbidden(
                "Customers must report incidents against one of their reservations".into(),
            ));
        }

        let incident = Incident::new(
            &vehicle.id,
            input.reservation_id,
            &actor.user_id,
            input.description.trim(),
            input.severity,
        );
        self.repos.incidents().save(incident.clone()).await?;

        if vehicle.status != VehicleStatus::Incident {
            vehicle.set_status(VehicleStatus::Incident);
            self.repos.vehicles().update(vehicle.clone()).await?;
        }

        warn!(
            incident_id = %incident.id,
            vehicle_id = %vehicle.id,
            severity = %incident.severity,
            "⚠️ Incident reported"
        );
        Ok(incident)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Incident> {
        self.repos
            .incidents()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Incident", id))
    }

    pub async fn list(
        &self,
        filter: &IncidentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Incident>> {
        self.repos.incidents().list(filter, params).await
    }

    /// Resolve an incident. The vehicle returns to AVAILABLE once it has no
    /// other open incident.
    pub async fn resolve(&self, actor: &Actor, id: &str) -> DomainResult<Incident> {
        actor.require_admin()?;
        let mut incident = self.get(id).await?;
        incident.resolve()?;
        self.repos.incidents().update(incident.clone()).await?;

        let still_open = self
            .repos
            .incidents()
            .count_open_for_vehicle(&incident.vehicle_id)
            .await?;
        if still_open == 0 {
            if let Some(mut vehicle) = self.repos.vehicles().find_by_id(&incident.vehicle_id).await? {
                if vehicle.status == VehicleStatus::Incident {
                    vehicle.set_status(VehicleStatus::Available);
                    self.repos.vehicles().update(vehicle).await?;
                }
            }
        }

        info!(incident_id = %incident.id, vehicle_id = %incident.vehicle_id, "Incident resolved");
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::incident::IncidentStatus;
    use crate::domain::user::UserRole;

    #[tokio::test]
    async fn vehicle_blocked_until_last_incident_resolved() {
        let repos = testing::repos().await;
        let service = IncidentService::new(repos.clone());
        let admin = testing::user(&repos, UserRole::Admin).await;
        let vehicle = testing::vehicle(&repos).await;

        let new = |description: &str| NewIncident {
            vehicle_id: vehicle.id.clone(),
            reservation_id: None,
            description: description.into(),
            severity: IncidentSeverity::Medium,
        };
        let first = service.create(&admin, new("scratch")).await.unwrap();
        let second = service.create(&admin, new("flat tyre")).await.unwrap();
        let status = |repos: Arc<dyn RepositoryProvider>, id: String| async move {
            repos.vehicles().find_by_id(&id).await.unwrap().unwrap().status
        };
        assert_eq!(status(repos.clone(), vehicle.id.clone()).await, VehicleStatus::Incident);

        service.resolve(&admin, &first.id).await.unwrap();
        assert_eq!(status(repos.clone(), vehicle.id.clone()).await, VehicleStatus::Incident);

        let resolved = service.resolve(&admin, &second.id).await.unwrap();
        assert_eq!(resolved.status, IncidentStatus::Resolved);
        assert_eq!(status(repos.clone(), vehicle.id.clone()).await, VehicleStatus::Available);

        assert!(matches!(
            service.resolve(&admin, &second.id).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn customers_report_against_own_reservation() {
        let repos = testing::repos().await;
        let service = IncidentService::new(repos.clone());
        let customer = testing::user(&repos, UserRole::Customer).await;
        let stranger = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let reservation = testing::reservation(&repos, &vehicle, &customer, 1, 1).await;

        let input = NewIncident {
            vehicle_id: vehicle.id.clone(),
            reservation_id: Some(reservation.id.clone()),
            description: "dent".into(),
            severity: IncidentSeverity::Low,
        };
        assert!(matches!(
            service.create(&stranger, input.clone()).await,
            Err(DomainError::Forbidden(_))
        ));
        let incident = service.create(&customer, input).await.unwrap();
        assert_eq!(incident.reported_by, customer.user_id);

        let mut anonymous = NewIncident {
            vehicle_id: vehicle.id.clone(),
            reservation_id: None,
            description: "dent".into(),
            severity: IncidentSeverity::Low,
        };
        assert!(service.create(&customer, anonymous.clone()).await.is_err());
        anonymous.description = "  ".into();
        assert!(matches!(
            service.create(&customer, anonymous).await,
            Err(DomainError::Validation(_))
        ));
    }
}
