//! Car-sitter handovers
//!
//! A pickup or dropoff request is decided exactly once by its assigned car
//! sitter (or an admin); the decision drives the reservation and vehicle
//! statuses. The decision is stored before any side effect, so a concurrent
//! second decision of the same request fails without touching anything.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::reservation::sync_vehicle_status;
use crate::application::Actor;
use crate::domain::handover::{
    HandoverFilter, HandoverKind, HandoverRequest, PenaltyInput, PenaltyPolicy,
};
use crate::domain::incident::{Incident, IncidentSeverity};
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::domain::user::{User, UserRole};
use crate::domain::vehicle::VehicleStatus;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct NewHandover {
    pub reservation_id: String,
    pub car_sitter_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidatePickup {
    pub request_id: String,
    pub is_validated: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidateDropoff {
    pub request_id: String,
    pub is_validated: bool,
    pub notes: Option<String>,
    pub current_mileage: Option<i64>,
    pub has_accident: bool,
    /// Overrides the computed penalty, cents
    pub penalty_amount: Option<i64>,
}

pub struct CarSitterService {
    repos: Arc<dyn RepositoryProvider>,
    penalty_policy: PenaltyPolicy,
}

impl CarSitterService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, penalty_policy: PenaltyPolicy) -> Self {
        Self {
            repos,
            penalty_policy,
        }
    }

    /// Active car sitters
    pub async fn list_car_sitters(&self, params: PaginationParams) -> DomainResult<PaginatedResult<User>> {
        self.repos
            .users()
            .list(Some(UserRole::CarSitter), true, params)
            .await
    }

    async fn load_reservation(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    async fn load_request(&self, id: &str, kind: HandoverKind) -> DomainResult<HandoverRequest> {
        let request = self
            .repos
            .handovers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("HandoverRequest", id))?;
        if request.kind != kind {
            return Err(DomainError::Validation(format!(
                "Request {} is a {} request, not {}",
                id, request.kind, kind
            )));
        }
        Ok(request)
    }

    async fn ensure_car_sitter(&self, id: &str) -> DomainResult<()> {
        let user = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;
        if !user.is_car_sitter() || !user.is_active {
            return Err(DomainError::Validation(format!(
                "User {} is not an active car sitter",
                id
            )));
        }
        Ok(())
    }

    fn ensure_can_decide(actor: &Actor, request: &HandoverRequest) -> DomainResult<()> {
        if actor.is_admin() || actor.user_id == request.car_sitter_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Only the assigned car sitter or an admin can validate this request".into(),
            ))
        }
    }

    pub async fn create_pickup(&self, actor: &Actor, input: NewHandover) -> DomainResult<HandoverRequest> {
        let mut reservation = self.load_reservation(&input.reservation_id).await?;
        actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        self.ensure_car_sitter(&input.car_sitter_id).await?;
        if input.location.trim().is_empty() {
            return Err(DomainError::Validation("location is required".into()));
        }

        reservation.transition_to(ReservationStatus::PickupRequested)?;
        let request = HandoverRequest::new(
            HandoverKind::Pickup,
            &reservation.id,
            input.car_sitter_id,
            input.scheduled_at,
            input.location,
            input.notes,
        );
        self.repos.handovers().save(request.clone()).await?;
        self.repos.reservations().update(reservation).await?;

        info!(
            request_id = %request.id,
            reservation_id = %request.reservation_id,
            car_sitter_id = %request.car_sitter_id,
            "🚗 Pickup requested"
        );
        Ok(request)
    }

    pub async fn create_dropoff(&self, actor: &Actor, input: NewHandover) -> DomainResult<HandoverRequest> {
        let reservation = self.load_reservation(&input.reservation_id).await?;
        actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        if reservation.status != ReservationStatus::PickedUp {
            return Err(DomainError::Conflict(format!(
                "Dropoff needs a PICKED_UP reservation (current: {})",
                reservation.status
            )));
        }
        if self
            .repos
            .handovers()
            .find_pending(&reservation.id, HandoverKind::Dropoff)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Reservation {} already has a pending dropoff request",
                reservation.id
            )));
        }
        self.ensure_car_sitter(&input.car_sitter_id).await?;
        if input.location.trim().is_empty() {
            return Err(DomainError::Validation("location is required".into()));
        }

        let request = HandoverRequest::new(
            HandoverKind::Dropoff,
            &reservation.id,
            input.car_sitter_id,
            input.scheduled_at,
            input.location,
            input.notes,
        );
        self.repos.handovers().save(request.clone()).await?;
        info!(request_id = %request.id, reservation_id = %reservation.id, "Dropoff requested");
        Ok(request)
    }

    /// Car sitters see their own requests, customers those of one of their
    /// reservations, admins everything.
    pub async fn list_requests(
        &self,
        actor: &Actor,
        kind: HandoverKind,
        mut filter: HandoverFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<HandoverRequest>> {
        filter.kind = Some(kind);
        if actor.is_car_sitter() {
            filter.car_sitter_id = Some(actor.user_id.clone());
        } else if !actor.is_admin() {
            let Some(reservation_id) = filter.reservation_id.as_deref() else {
                return Err(DomainError::Forbidden(
                    "reservation_id is required to list handover requests".into(),
                ));
            };
            let reservation = self.load_reservation(reservation_id).await?;
            actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        }
        self.repos.handovers().list(&filter, params).await
    }

    pub async fn validate_pickup(&self, actor: &Actor, input: ValidatePickup) -> DomainResult<HandoverRequest> {
        let mut request = self.load_request(&input.request_id, HandoverKind::Pickup).await?;
        Self::ensure_can_decide(actor, &request)?;
        let mut reservation = self.load_reservation(&request.reservation_id).await?;

        request.decide(input.is_validated, input.notes)?;
        let next = if input.is_validated {
            ReservationStatus::PickedUp
        } else {
            ReservationStatus::Confirmed
        };
        reservation.transition_to(next)?;

        self.repos.handovers().decide(request.clone()).await?;
        self.repos.reservations().update(reservation.clone()).await?;
        sync_vehicle_status(self.repos.as_ref(), &reservation).await?;

        info!(
            request_id = %request.id,
            reservation_id = %reservation.id,
            validated = input.is_validated,
            "Pickup {}",
            request.status
        );
        Ok(request)
    }

    pub async fn validate_dropoff(&self, actor: &Actor, input: ValidateDropoff) -> DomainResult<HandoverRequest> {
        let mut request = self.load_request(&input.request_id, HandoverKind::Dropoff).await?;
        Self::ensure_can_decide(actor, &request)?;
        let mut reservation = self.load_reservation(&request.reservation_id).await?;

        if !input.is_validated {
            request.decide(false, input.notes)?;
            request.current_mileage = input.current_mileage;
            request.has_accident = input.has_accident;
            self.repos.handovers().decide(request.clone()).await?;
            warn!(request_id = %request.id, reservation_id = %reservation.id, "Dropoff rejected");
            return Ok(request);
        }

        let mileage = input.current_mileage.ok_or_else(|| {
            DomainError::Validation("current_mileage is required to validate a dropoff".into())
        })?;
        if let Some(amount) = input.penalty_amount {
            if amount < 0 {
                return Err(DomainError::Validation("penalty_amount must not be negative".into()));
            }
        }
        let mut vehicle = self
            .repos
            .vehicles()
            .find_by_id(&reservation.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", reservation.vehicle_id.as_str()))?;

        let computed = self.penalty_policy.compute(PenaltyInput {
            start_mileage: vehicle.current_mileage,
            end_mileage: mileage,
            rental_days: reservation.rental_days(),
            has_accident: input.has_accident,
        })?;
        let penalty = input.penalty_amount.unwrap_or(computed.total);

        request.decide(true, input.notes)?;
        request.current_mileage = Some(mileage);
        request.has_accident = input.has_accident;
        request.penalty_amount = Some(penalty);
        reservation.transition_to(ReservationStatus::Completed)?;

        vehicle.record_mileage(mileage);
        vehicle.set_status(if input.has_accident {
            VehicleStatus::Incident
        } else {
            VehicleStatus::Available
        });

        self.repos.handovers().decide(request.clone()).await?;
        self.repos.reservations().update(reservation.clone()).await?;
        self.repos.vehicles().update(vehicle.clone()).await?;

        if input.has_accident {
            let incident = Incident::new(
                &vehicle.id,
                Some(reservation.id.clone()),
                &actor.user_id,
                format!("Accident reported at dropoff of reservation {}", reservation.id),
                IncidentSeverity::High,
            );
            self.repos.incidents().save(incident.clone()).await?;
            warn!(
                incident_id = %incident.id,
                vehicle_id = %vehicle.id,
                "⚠️ Accident reported at dropoff"
            );
        }

        info!(
            request_id = %request.id,
            reservation_id = %reservation.id,
            driven_km = computed.driven_km,
            penalty_cents = penalty,
            "🏁 Dropoff validated"
        );
        Ok(request)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::handover::HandoverStatus;
    use crate::domain::incident::IncidentFilter;
    use crate::domain::vehicle::Vehicle;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        service: CarSitterService,
        customer: Actor,
        sitter: Actor,
        vehicle: Vehicle,
        reservation: Reservation,
    }

    async fn fixture(status: ReservationStatus) -> Fixture {
        let repos = testing::repos().await;
        let service = CarSitterService::new(repos.clone(), PenaltyPolicy::default());
        let customer = testing::user(&repos, UserRole::Customer).await;
        let sitter = testing::user(&repos, UserRole::CarSitter).await;
        let vehicle = testing::vehicle(&repos).await;
        let mut reservation = testing::reservation(&repos, &vehicle, &customer, 2, 2).await;
        reservation.status = status;
        repos.reservations().update(reservation.clone()).await.unwrap();
        Fixture {
            repos,
            service,
            customer,
            sitter,
            vehicle,
            reservation,
        }
    }

    fn handover(f: &Fixture) -> NewHandover {
        NewHandover {
            reservation_id: f.reservation.id.clone(),
            car_sitter_id: f.sitter.user_id.clone(),
            scheduled_at: f.reservation.start_datetime,
            location: "Gare de Lyon".into(),
            notes: None,
        }
    }

    async fn reservation_status(f: &Fixture) -> ReservationStatus {
        f.repos
            .reservations()
            .find_by_id(&f.reservation.id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn pickup_needs_confirmed_reservation() {
        let f = fixture(ReservationStatus::Pending).await;
        assert!(matches!(
            f.service.create_pickup(&f.customer, handover(&f)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn pickup_assignee_must_be_a_car_sitter() {
        let f = fixture(ReservationStatus::Confirmed).await;
        let mut input = handover(&f);
        input.car_sitter_id = f.customer.user_id.clone();
        assert!(matches!(
            f.service.create_pickup(&f.customer, input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn validated_pickup_rents_the_vehicle() {
        let f = fixture(ReservationStatus::Confirmed).await;
        let request = f.service.create_pickup(&f.customer, handover(&f)).await.unwrap();
        assert_eq!(reservation_status(&f).await, ReservationStatus::PickupRequested);

        let decided = f
            .service
            .validate_pickup(
                &f.sitter,
                ValidatePickup {
                    request_id: request.id.clone(),
                    is_validated: true,
                    notes: Some("clean".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(decided.status, HandoverStatus::Validated);
        assert_eq!(reservation_status(&f).await, ReservationStatus::PickedUp);
        let v = f.repos.vehicles().find_by_id(&f.vehicle.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Rented);

        // double click
        let again = f
            .service
            .validate_pickup(
                &f.sitter,
                ValidatePickup {
                    request_id: request.id,
                    is_validated: true,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn rejected_pickup_returns_to_confirmed() {
        let f = fixture(ReservationStatus::Confirmed).await;
        let request = f.service.create_pickup(&f.customer, handover(&f)).await.unwrap();
        f.service
            .validate_pickup(
                &f.sitter,
                ValidatePickup {
                    request_id: request.id,
                    is_validated: false,
                    notes: Some("customer absent".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(reservation_status(&f).await, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn only_assignee_or_admin_validates() {
        let f = fixture(ReservationStatus::Confirmed).await;
        let request = f.service.create_pickup(&f.customer, handover(&f)).await.unwrap();
        let other_sitter = testing::user(&f.repos, UserRole::CarSitter).await;
        let result = f
            .service
            .validate_pickup(
                &other_sitter,
                ValidatePickup {
                    request_id: request.id,
                    is_validated: true,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn one_pending_dropoff_per_reservation() {
        let f = fixture(ReservationStatus::PickedUp).await;
        f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();
        assert!(matches!(
            f.service.create_dropoff(&f.customer, handover(&f)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn validated_dropoff_computes_penalty_and_completes() {
        let f = fixture(ReservationStatus::PickedUp).await;
        let request = f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();

        // 2 days include 400 km; 500 driven -> 100 km * 25 cents
        let decided = f
            .service
            .validate_dropoff(
                &f.sitter,
                ValidateDropoff {
                    request_id: request.id,
                    is_validated: true,
                    notes: None,
                    current_mileage: Some(f.vehicle.current_mileage + 500),
                    has_accident: false,
                    penalty_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(decided.penalty_amount, Some(2500));
        assert_eq!(reservation_status(&f).await, ReservationStatus::Completed);

        let v = f.repos.vehicles().find_by_id(&f.vehicle.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Available);
        assert_eq!(v.current_mileage, f.vehicle.current_mileage + 500);
    }

    #[tokio::test]
    async fn accident_at_dropoff_opens_incident() {
        let f = fixture(ReservationStatus::PickedUp).await;
        let request = f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();
        let decided = f
            .service
            .validate_dropoff(
                &f.sitter,
                ValidateDropoff {
                    request_id: request.id,
                    is_validated: true,
                    notes: Some("rear bumper".into()),
                    current_mileage: Some(f.vehicle.current_mileage + 100),
                    has_accident: true,
                    penalty_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(decided.penalty_amount, Some(50_000));

        let v = f.repos.vehicles().find_by_id(&f.vehicle.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Incident);
        let incidents = f
            .repos
            .incidents()
            .list(
                &IncidentFilter {
                    vehicle_id: Some(f.vehicle.id.clone()),
                    ..Default::default()
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(incidents.total, 1);
    }

    #[tokio::test]
    async fn concurrent_dropoff_validations_apply_once() {
        let f = fixture(ReservationStatus::PickedUp).await;
        let request = f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();
        let input = ValidateDropoff {
            request_id: request.id,
            is_validated: true,
            notes: None,
            current_mileage: Some(f.vehicle.current_mileage + 100),
            has_accident: true,
            penalty_amount: None,
        };

        let (first, second) = tokio::join!(
            f.service.validate_dropoff(&f.sitter, input.clone()),
            f.service.validate_dropoff(&f.sitter, input.clone()),
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict(_)))));

        let incidents = f
            .repos
            .incidents()
            .list(
                &IncidentFilter {
                    vehicle_id: Some(f.vehicle.id.clone()),
                    ..Default::default()
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(incidents.total, 1);
    }

    #[tokio::test]
    async fn concurrent_pickup_validations_apply_once() {
        let f = fixture(ReservationStatus::Confirmed).await;
        let request = f.service.create_pickup(&f.customer, handover(&f)).await.unwrap();
        let input = ValidatePickup {
            request_id: request.id,
            is_validated: true,
            notes: None,
        };

        let (first, second) = tokio::join!(
            f.service.validate_pickup(&f.sitter, input.clone()),
            f.service.validate_pickup(&f.sitter, input.clone()),
        );
        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(reservation_status(&f).await, ReservationStatus::PickedUp);
    }

    #[tokio::test]
    async fn dropoff_with_lower_mileage_is_invalid() {
        let f = fixture(ReservationStatus::PickedUp).await;
        let request = f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();
        let result = f
            .service
            .validate_dropoff(
                &f.sitter,
                ValidateDropoff {
                    request_id: request.id.clone(),
                    is_validated: true,
                    notes: None,
                    current_mileage: Some(f.vehicle.current_mileage - 1),
                    has_accident: false,
                    penalty_amount: None,
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        // request untouched
        let stored = f.repos.handovers().find_by_id(&request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, HandoverStatus::Pending);
    }

    #[tokio::test]
    async fn rejected_dropoff_keeps_reservation_picked_up() {
        let f = fixture(ReservationStatus::PickedUp).await;
        let request = f.service.create_dropoff(&f.customer, handover(&f)).await.unwrap();
        f.service
            .validate_dropoff(
                &f.sitter,
                ValidateDropoff {
                    request_id: request.id,
                    is_validated: false,
                    notes: Some("car not at location".into()),
                    current_mileage: None,
                    has_accident: false,
                    penalty_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(reservation_status(&f).await, ReservationStatus::PickedUp);
    }

    #[tokio::test]
    async fn sitters_list_only_their_requests() {
        let f = fixture(ReservationStatus::Confirmed).await;
        f.service.create_pickup(&f.customer, handover(&f)).await.unwrap();
        let other_sitter = testing::user(&f.repos, UserRole::CarSitter).await;

        let mine = f
            .service
            .list_requests(&f.sitter, HandoverKind::Pickup, HandoverFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 1);
        let theirs = f
            .service
            .list_requests(&other_sitter, HandoverKind::Pickup, HandoverFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(theirs.total, 0);

        let sitters = f.service.list_car_sitters(PaginationParams::default()).await.unwrap();
        assert_eq!(sitters.total, 2);
    }
}
