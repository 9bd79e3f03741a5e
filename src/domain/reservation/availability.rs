//! Availability rules
//!
//! A vehicle is available for a window when it is bookable and no blocking
//! reservation of that vehicle overlaps the window.

use chrono::{DateTime, Utc};

use super::model::Reservation;
use crate::domain::vehicle::Vehicle;

#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub vehicle_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Reservation being edited, ignored when looking for conflicts
    pub exclude_reservation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Availability {
    pub is_available: bool,
    pub conflicts: Vec<Reservation>,
    pub message: Option<String>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            is_available: true,
            conflicts: Vec::new(),
            message: None,
        }
    }

    /// Evaluate `query` against `vehicle` and the reservations known for it.
    ///
    /// `existing` may contain non-blocking reservations or reservations of
    /// other vehicles; they are ignored.
    pub fn evaluate(query: &AvailabilityQuery, vehicle: &Vehicle, existing: &[Reservation]) -> Self {
        if !vehicle.status.is_bookable() {
            return Self {
                is_available: false,
                conflicts: Vec::new(),
                message: Some(format!(
                    "Vehicle is not available for booking (status {})",
                    vehicle.status
                )),
            };
        }

        let conflicts: Vec<Reservation> = existing
            .iter()
            .filter(|r| r.vehicle_id == query.vehicle_id)
            .filter(|r| r.status.is_blocking())
            .filter(|r| query.exclude_reservation_id.as_deref() != Some(r.id.as_str()))
            .filter(|r| r.overlaps(query.start, query.end))
            .cloned()
            .collect();

        if conflicts.is_empty() {
            return Self::available();
        }

        let message = format!(
            "Vehicle already booked for {} overlapping reservation(s)",
            conflicts.len()
        );
        Self {
            is_available: false,
            conflicts,
            message: Some(message),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::ReservationStatus;
    use crate::domain::vehicle::{FuelType, VehicleStatus};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn vehicle() -> Vehicle {
        let mut v = Vehicle::new("Fiat", "500", 2020, "FI-500", FuelType::Petrol, 1000, None, 3000);
        v.id = "v-1".into();
        v
    }

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>, status: ReservationStatus) -> Reservation {
        let mut r = Reservation::new("v-1", "c-1", start, end, "A", "B", false, None);
        r.status = status;
        r
    }

    fn query(start: DateTime<Utc>, end: DateTime<Utc>) -> AvailabilityQuery {
        AvailabilityQuery {
            vehicle_id: "v-1".into(),
            start,
            end,
            exclude_reservation_id: None,
        }
    }

    #[test]
    fn confirmed_overlap_blocks_booking() {
        let existing = vec![booking(at(11, 0), at(11, 12), ReservationStatus::Confirmed)];
        let result = Availability::evaluate(&query(at(10, 10), at(12, 10)), &vehicle(), &existing);
        assert!(!result.is_available);
        assert_eq!(result.conflicts.len(), 1);
        assert!(result.message.is_some());
    }

    #[test]
    fn cancelled_and_completed_do_not_block() {
        let existing = vec![
            booking(at(11, 0), at(11, 12), ReservationStatus::Cancelled),
            booking(at(11, 0), at(11, 12), ReservationStatus::Completed),
        ];
        let result = Availability::evaluate(&query(at(10, 10), at(12, 10)), &vehicle(), &existing);
        assert!(result.is_available);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn excluded_reservation_is_ignored() {
        let own = booking(at(11, 0), at(11, 12), ReservationStatus::Pending);
        let mut q = query(at(10, 10), at(12, 10));
        q.exclude_reservation_id = Some(own.id.clone());
        assert!(Availability::evaluate(&q, &vehicle(), &[own]).is_available);
    }

    #[test]
    fn back_to_back_is_available() {
        let existing = vec![booking(at(10, 0), at(10, 10), ReservationStatus::PickedUp)];
        assert!(Availability::evaluate(&query(at(10, 10), at(12, 10)), &vehicle(), &existing).is_available);
    }

    #[test]
    fn vehicle_in_maintenance_is_unavailable() {
        let mut v = vehicle();
        v.status = VehicleStatus::Maintenance;
        let result = Availability::evaluate(&query(at(10, 10), at(12, 10)), &v, &[]);
        assert!(!result.is_available);
        assert!(result.conflicts.is_empty());
        assert!(result.message.unwrap().contains("MAINTENANCE"));
    }
}
