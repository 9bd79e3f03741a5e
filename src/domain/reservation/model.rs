//! Reservation domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

str_enum! {
    /// Reservation status
    ///
    /// ```text
    /// PENDING ──► CONFIRMED ──► PICKUP_REQUESTED ──► PICKED_UP ──► COMPLETED
    ///    │            │  ▲               │
    ///    ▼            ▼  └───────────────┘ (pickup rejected)
    /// CANCELLED ◄─────┘
    /// ```
    pub enum ReservationStatus {
        /// Created, waiting for payment
        Pending => "PENDING",
        /// Paid
        Confirmed => "CONFIRMED",
        /// A car sitter has been asked to hand the vehicle over
        PickupRequested => "PICKUP_REQUESTED",
        PickedUp => "PICKED_UP",
        Cancelled => "CANCELLED",
        Completed => "COMPLETED",
    }
}

impl ReservationStatus {
    /// Statuses reachable in one step from `self`
    pub fn allowed_transitions(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[PickupRequested, Cancelled],
            PickupRequested => &[PickedUp, Confirmed],
            PickedUp => &[Completed],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether a reservation in this status holds the vehicle for its window
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::PickupRequested | Self::PickedUp
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    pub fn blocking() -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        &[Pending, Confirmed, PickupRequested, PickedUp]
    }
}

/// A customer's booking of a vehicle for a time interval
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: String,
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Vehicle delivered and collected by a car sitter
    pub car_sitting_option: bool,
    pub status: ReservationStatus,
    /// Total price in cents
    pub total_price: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vehicle_id: impl Into<String>,
        customer_id: impl Into<String>,
        start_datetime: DateTime<Utc>,
        end_datetime: DateTime<Utc>,
        pickup_location: impl Into<String>,
        dropoff_location: impl Into<String>,
        car_sitting_option: bool,
        total_price: Option<i64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vehicle_id: vehicle_id.into(),
            customer_id: customer_id.into(),
            start_datetime,
            end_datetime,
            pickup_location: pickup_location.into(),
            dropoff_location: dropoff_location.into(),
            car_sitting_option,
            status: ReservationStatus::Pending,
            total_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// A booking window must be non-empty and start in the future.
    pub fn validate_window(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if end <= start {
            return Err(DomainError::Validation(
                "end_datetime must be after start_datetime".into(),
            ));
        }
        if start <= now {
            return Err(DomainError::Validation(
                "start_datetime must be in the future".into(),
            ));
        }
        Ok(())
    }

    /// Half-open interval overlap: back-to-back windows do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_datetime < end && start < self.end_datetime
    }

    /// Billable days: whole 24h blocks rounded up, at least one.
    pub fn rental_days(&self) -> i64 {
        rental_days(self.start_datetime, self.end_datetime)
    }

    /// Move to `next` when the state machine allows it.
    pub fn transition_to(&mut self, next: ReservationStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::Conflict(format!(
                "Reservation {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Customer cancellation, allowed only before payment.
    pub fn cancel_by_customer(&mut self) -> Result<(), DomainError> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Only PENDING reservations can be cancelled (current: {})",
                self.status
            )));
        }
        self.transition_to(ReservationStatus::Cancelled)
    }

    /// Date and location edits are only possible while PENDING.
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Reservation {} can no longer be modified (status {})",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let minutes = (end - start).num_minutes().max(0);
    let day = 24 * 60;
    ((minutes + day - 1) / day).max(1)
}

// ── Tests ──────────────────────────────────────────────────────
