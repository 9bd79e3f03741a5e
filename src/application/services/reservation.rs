//! Reservation use cases
//!
//! The availability check and the write that follows it run under one
//! booking lock, so two overlapping bookings of a vehicle cannot both pass
//! the check.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::Actor;
use crate::domain::reservation::{
    quote_total, Availability, AvailabilityQuery, Reservation, ReservationFilter,
    ReservationStatus,
};
use crate::domain::vehicle::{Vehicle, VehicleStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub vehicle_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub car_sitting_option: bool,
    /// Book on behalf of another customer (admins only)
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub car_sitting_option: Option<bool>,
}

impl ReservationChanges {
    fn touches_window(&self) -> bool {
        self.start_datetime.is_some()
            || self.end_datetime.is_some()
            || self.car_sitting_option.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    /// Blocking reservations that have not started yet
    pub upcoming: u64,
    /// Sum of PAID invoices, cents
    pub revenue_cents: i64,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    car_sitting_fee: i64,
    booking_lock: Mutex<()>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, car_sitting_fee: i64) -> Self {
        Self {
            repos,
            car_sitting_fee,
            booking_lock: Mutex::new(()),
        }
    }

    async fn load_vehicle(&self, vehicle_id: &str) -> DomainResult<Vehicle> {
        self.repos
            .vehicles()
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", vehicle_id))
    }

    async fn load(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    async fn evaluate(&self, query: &AvailabilityQuery) -> DomainResult<(Vehicle, Availability)> {
        if query.end <= query.start {
            return Err(DomainError::Validation(
                "end_datetime must be after start_datetime".into(),
            ));
        }
        let vehicle = self.load_vehicle(&query.vehicle_id).await?;
        let existing = self
            .repos
            .reservations()
            .find_blocking_for_vehicle(&query.vehicle_id, query.start, query.end)
            .await?;
        let availability = Availability::evaluate(query, &vehicle, &existing);
        Ok((vehicle, availability))
    }

    pub async fn check_availability(&self, query: &AvailabilityQuery) -> DomainResult<Availability> {
        Ok(self.evaluate(query).await?.1)
    }

    pub async fn create(&self, actor: &Actor, input: NewReservation) -> DomainResult<Reservation> {
        Reservation::validate_window(input.start_datetime, input.end_datetime, Utc::now())?;
        if input.pickup_location.trim().is_empty() || input.dropoff_location.trim().is_empty() {
            return Err(DomainError::Validation(
                "pickup_location and dropoff_location are required".into(),
            ));
        }

        let customer_id = match input.customer_id {
            Some(id) if id != actor.user_id => {
                actor.require_admin()?;
                self.repos
                    .users()
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("User", id.as_str()))?;
                id
            }
            _ => actor.user_id.clone(),
        };

        let _guard = self.booking_lock.lock().await;

        let query = AvailabilityQuery {
            vehicle_id: input.vehicle_id.clone(),
            start: input.start_datetime,
            end: input.end_datetime,
            exclude_reservation_id: None,
        };
        let (vehicle, availability) = self.evaluate(&query).await?;
        if !availability.is_available {
            return Err(DomainError::Conflict(availability.message.unwrap_or_else(|| {
                "Vehicle is not available for the requested period".to_string()
            })));
        }

        let total = quote_total(
            vehicle.price_per_day,
            input.start_datetime,
            input.end_datetime,
            input.car_sitting_option,
            self.car_sitting_fee,
        );
        let reservation = Reservation::new(
            &vehicle.id,
            customer_id,
            input.start_datetime,
            input.end_datetime,
            input.pickup_location,
            input.dropoff_location,
            input.car_sitting_option,
            Some(total),
        );
        self.repos.reservations().save(reservation.clone()).await?;

        metrics::counter!("flexcars_reservations_created_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            vehicle_id = %vehicle.id,
            customer_id = %reservation.customer_id,
            total_cents = total,
            "📅 Reservation created"
        );
        Ok(reservation)
    }

    /// Reservations are visible to their customer, car sitters and admins.
    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Reservation> {
        let reservation = self.load(id).await?;
        if !actor.is_car_sitter() {
            actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        }
        Ok(reservation)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: ReservationFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        if !actor.is_admin() && !actor.is_car_sitter() {
            filter.customer_id = Some(actor.user_id.clone());
        }
        self.repos.reservations().list(&filter, params).await
    }

    /// Edit dates, locations or the car-sitting option of a PENDING
    /// reservation. Window changes re-run the availability check.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: ReservationChanges,
    ) -> DomainResult<Reservation> {
        let _guard = self.booking_lock.lock().await;

        let mut reservation = self.load(id).await?;
        actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        reservation.ensure_editable()?;

        if let Some(loc) = changes.pickup_location.as_deref() {
            if loc.trim().is_empty() {
                return Err(DomainError::Validation("pickup_location is empty".into()));
            }
        }
        if let Some(loc) = changes.dropoff_location.as_deref() {
            if loc.trim().is_empty() {
                return Err(DomainError::Validation("dropoff_location is empty".into()));
            }
        }

        if changes.touches_window() {
            let start = changes.start_datetime.unwrap_or(reservation.start_datetime);
            let end = changes.end_datetime.unwrap_or(reservation.end_datetime);
            Reservation::validate_window(start, end, Utc::now())?;

            let query = AvailabilityQuery {
                vehicle_id: reservation.vehicle_id.clone(),
                start,
                end,
                exclude_reservation_id: Some(reservation.id.clone()),
            };
            let (vehicle, availability) = self.evaluate(&query).await?;
            if !availability.is_available {
                return Err(DomainError::Conflict(availability.message.unwrap_or_else(
                    || "Vehicle is not available for the requested period".to_string(),
                )));
            }

            let car_sitting = changes
                .car_sitting_option
                .unwrap_or(reservation.car_sitting_option);
            reservation.start_datetime = start;
            reservation.end_datetime = end;
            reservation.car_sitting_option = car_sitting;
            reservation.total_price = Some(quote_total(
                vehicle.price_per_day,
                start,
                end,
                car_sitting,
                self.car_sitting_fee,
            ));
        }

        if let Some(loc) = changes.pickup_location {
            reservation.pickup_location = loc;
        }
        if let Some(loc) = changes.dropoff_location {
            reservation.dropoff_location = loc;
        }
        reservation.updated_at = Utc::now();

        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %reservation.id, "Reservation updated");
        Ok(reservation)
    }

    /// Customer cancellation, PENDING only.
    pub async fn cancel(&self, actor: &Actor, id: &str) -> DomainResult<Reservation> {
        let mut reservation = self.load(id).await?;
        actor.require_owner_or_admin(&reservation.customer_id, "reservation")?;
        reservation.cancel_by_customer()?;
        self.repos.reservations().update(reservation.clone()).await?;
        void_open_invoice(self.repos.as_ref(), &reservation.id).await?;
        info!(reservation_id = %reservation.id, "Reservation cancelled by customer");
        Ok(reservation)
    }

    /// Admin status change, guarded by the reservation state machine.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        next: ReservationStatus,
    ) -> DomainResult<Reservation> {
        actor.require_admin()?;
        let mut reservation = self.load(id).await?;
        let previous = reservation.status;
        reservation.transition_to(next)?;
        self.repos.reservations().update(reservation.clone()).await?;
        sync_vehicle_status(self.repos.as_ref(), &reservation).await?;
        if next == ReservationStatus::Cancelled {
            void_open_invoice(self.repos.as_ref(), &reservation.id).await?;
        }

        info!(
            reservation_id = %reservation.id,
            from = %previous,
            to = %next,
            "Reservation status changed"
        );
        Ok(reservation)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;
        let reservation = self.load(id).await?;
        if reservation.status.is_blocking() && reservation.status != ReservationStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Reservation {} is {}; cancel it before deleting",
                reservation.id, reservation.status
            )));
        }
        self.repos.reservations().delete(id).await?;
        warn!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }

    pub async fn stats(&self) -> DomainResult<ReservationStats> {
        reservation_stats(self.repos.as_ref()).await
    }
}

pub(crate) async fn reservation_stats(repos: &dyn RepositoryProvider) -> DomainResult<ReservationStats> {
    let counts = repos.reservations().count_by_status().await?;
    let upcoming = repos.reservations().count_upcoming(Utc::now()).await?;
    let revenue_cents = repos.invoices().sum_paid().await?;

    let by_status: BTreeMap<String, u64> = ReservationStatus::ALL
        .iter()
        .map(|s| {
            let count = counts
                .iter()
                .find(|(status, _)| status == s)
                .map(|(_, c)| *c)
                .unwrap_or(0);
            (s.as_str().to_string(), count)
        })
        .collect();

    Ok(ReservationStats {
        total: by_status.values().sum(),
        by_status,
        upcoming,
        revenue_cents,
    })
}

/// Align the vehicle's fleet status with a reservation that just changed
/// status. A vehicle under INCIDENT or MAINTENANCE is left alone.
pub(crate) async fn sync_vehicle_status(
    repos: &dyn RepositoryProvider,
    reservation: &Reservation,
) -> DomainResult<()> {
    let Some(mut vehicle) = repos.vehicles().find_by_id(&reservation.vehicle_id).await? else {
        return Ok(());
    };
    let target = match (reservation.status, vehicle.status) {
        (ReservationStatus::Confirmed, VehicleStatus::Available) => VehicleStatus::Reserved,
        (ReservationStatus::PickedUp, VehicleStatus::Available | VehicleStatus::Reserved) => {
            VehicleStatus::Rented
        }
        (ReservationStatus::Cancelled, VehicleStatus::Reserved) => VehicleStatus::Available,
        (ReservationStatus::Completed, VehicleStatus::Rented | VehicleStatus::Reserved) => {
            VehicleStatus::Available
        }
        _ => return Ok(()),
    };
    vehicle.set_status(target);
    repos.vehicles().update(vehicle).await
}

/// Void the reservation's invoice if it is still awaiting payment. Paid
/// invoices are left for the refund flow.
pub(crate) async fn void_open_invoice(
    repos: &dyn RepositoryProvider,
    reservation_id: &str,
) -> DomainResult<()> {
    let Some(mut invoice) = repos.invoices().find_by_reservation(reservation_id).await? else {
        return Ok(());
    };
    if !invoice.status.is_payable() {
        return Ok(());
    }
    invoice.void()?;
    repos.invoices().update(invoice.clone()).await?;
    info!(invoice_id = %invoice.id, reservation_id, "Invoice voided");
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::billing::{Invoice, InvoiceStatus};
    use crate::domain::user::UserRole;
    use chrono::Duration;

    async fn setup() -> (Arc<dyn RepositoryProvider>, ReservationService) {
        let repos = testing::repos().await;
        let service = ReservationService::new(repos.clone(), 2500);
        (repos, service)
    }

    fn booking(vehicle: &Vehicle, from_days: i64, days: i64) -> NewReservation {
        let (start, end) = testing::window(from_days, days);
        NewReservation {
            vehicle_id: vehicle.id.clone(),
            start_datetime: start,
            end_datetime: end,
            pickup_location: "Paris".into(),
            dropoff_location: "Lyon".into(),
            car_sitting_option: false,
            customer_id: None,
        }
    }

    #[tokio::test]
    async fn create_prices_and_stores_pending() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;

        let mut input = booking(&vehicle, 2, 3);
        input.car_sitting_option = true;
        let r = service.create(&customer, input).await.unwrap();

        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.customer_id, customer.user_id);
        assert_eq!(r.total_price, Some(4500 * 3 + 2500));
    }

    #[tokio::test]
    async fn past_or_empty_windows_are_rejected() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;

        let mut past = booking(&vehicle, -3, 1);
        past.end_datetime = Utc::now() + Duration::days(1);
        assert!(matches!(
            service.create(&customer, past).await,
            Err(DomainError::Validation(_))
        ));

        let mut inverted = booking(&vehicle, 2, 1);
        inverted.end_datetime = inverted.start_datetime;
        assert!(matches!(
            service.create(&customer, inverted).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn overlapping_booking_conflicts() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;

        service.create(&customer, booking(&vehicle, 2, 3)).await.unwrap();
        let err = service
            .create(&customer, booking(&vehicle, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_bookings_only_one_wins() {
        let (repos, service) = setup().await;
        let service = Arc::new(service);
        let a = testing::user(&repos, UserRole::Customer).await;
        let b = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let input = booking(&vehicle, 5, 2);

        let (ra, rb) = tokio::join!(
            service.create(&a, input.clone()),
            service.create(&b, input.clone())
        );
        assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1);
    }

    #[tokio::test]
    async fn availability_reports_conflicts_and_exclusion() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let existing = service.create(&customer, booking(&vehicle, 2, 2)).await.unwrap();

        let mut query = AvailabilityQuery {
            vehicle_id: vehicle.id.clone(),
            start: existing.start_datetime + Duration::hours(12),
            end: existing.end_datetime + Duration::hours(12),
            exclude_reservation_id: None,
        };
        let availability = service.check_availability(&query).await.unwrap();
        assert!(!availability.is_available);
        assert_eq!(availability.conflicts.len(), 1);

        query.exclude_reservation_id = Some(existing.id.clone());
        assert!(service.check_availability(&query).await.unwrap().is_available);

        query.vehicle_id = "missing".into();
        assert!(matches!(
            service.check_availability(&query).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_rechecks_availability_excluding_itself() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let first = service.create(&customer, booking(&vehicle, 2, 2)).await.unwrap();
        let second = service.create(&customer, booking(&vehicle, 10, 2)).await.unwrap();

        // shifting within its own window is fine
        let moved = service
            .update(
                &customer,
                &first.id,
                ReservationChanges {
                    end_datetime: Some(first.end_datetime + Duration::days(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.total_price, Some(4500 * 3));

        // moving onto the second booking is not
        let err = service
            .update(
                &customer,
                &first.id,
                ReservationChanges {
                    start_datetime: Some(second.start_datetime),
                    end_datetime: Some(second.end_datetime),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn customer_cancel_only_from_pending() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        let vehicle = testing::vehicle(&repos).await;

        let r = service.create(&customer, booking(&vehicle, 2, 1)).await.unwrap();
        service
            .update_status(&admin, &r.id, ReservationStatus::Confirmed)
            .await
            .unwrap();
        assert!(matches!(
            service.cancel(&customer, &r.id).await,
            Err(DomainError::Conflict(_))
        ));

        let pending = service.create(&customer, booking(&vehicle, 8, 1)).await.unwrap();
        let cancelled = service.cancel(&customer, &pending.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_voids_the_unpaid_invoice() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        let vehicle = testing::vehicle(&repos).await;

        let by_customer = service.create(&customer, booking(&vehicle, 2, 1)).await.unwrap();
        let by_admin = service.create(&customer, booking(&vehicle, 6, 1)).await.unwrap();
        for r in [&by_customer, &by_admin] {
            let invoice = Invoice::new(&r.id, &customer.user_id, 2500, "EUR", 7);
            repos.invoices().save(invoice).await.unwrap();
        }

        service.cancel(&customer, &by_customer.id).await.unwrap();
        service
            .update_status(&admin, &by_admin.id, ReservationStatus::Cancelled)
            .await
            .unwrap();

        for r in [&by_customer, &by_admin] {
            let invoice = repos.invoices().find_by_reservation(&r.id).await.unwrap().unwrap();
            assert_eq!(invoice.status, InvoiceStatus::Cancelled);
        }
    }

    #[tokio::test]
    async fn other_customers_cannot_touch_a_reservation() {
        let (repos, service) = setup().await;
        let owner = testing::user(&repos, UserRole::Customer).await;
        let other = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        let r = service.create(&owner, booking(&vehicle, 2, 1)).await.unwrap();

        assert!(matches!(
            service.get(&other, &r.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.cancel(&other, &r.id).await,
            Err(DomainError::Forbidden(_))
        ));
        let listed = service
            .list(&other, ReservationFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(listed.total, 0);
    }

    #[tokio::test]
    async fn status_changes_follow_the_state_machine() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        let vehicle = testing::vehicle(&repos).await;
        let r = service.create(&customer, booking(&vehicle, 2, 1)).await.unwrap();

        assert!(matches!(
            service
                .update_status(&admin, &r.id, ReservationStatus::Completed)
                .await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            service
                .update_status(&customer, &r.id, ReservationStatus::Confirmed)
                .await,
            Err(DomainError::Forbidden(_))
        ));

        service
            .update_status(&admin, &r.id, ReservationStatus::Confirmed)
            .await
            .unwrap();
        let v = repos.vehicles().find_by_id(&vehicle.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Reserved);

        service
            .update_status(&admin, &r.id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        let v = repos.vehicles().find_by_id(&vehicle.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Available);
    }

    #[tokio::test]
    async fn stats_count_every_status() {
        let (repos, service) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let vehicle = testing::vehicle(&repos).await;
        service.create(&customer, booking(&vehicle, 2, 1)).await.unwrap();
        let r = service.create(&customer, booking(&vehicle, 6, 1)).await.unwrap();
        service.cancel(&customer, &r.id).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status["PENDING"], 1);
        assert_eq!(stats.by_status["CANCELLED"], 1);
        assert_eq!(stats.by_status["COMPLETED"], 0);
        assert_eq!(stats.upcoming, 1);
        assert_eq!(stats.revenue_cents, 0);
    }
}
