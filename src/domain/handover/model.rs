//! Handover request entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

str_enum! {
    pub enum HandoverKind {
        Pickup => "PICKUP",
        Dropoff => "DROPOFF",
    }
}

str_enum! {
    pub enum HandoverStatus {
        Pending => "PENDING",
        Validated => "VALIDATED",
        Rejected => "REJECTED",
    }
}

/// A pickup or dropoff request awaiting a car sitter's decision
#[derive(Debug, Clone)]
pub struct HandoverRequest {
    pub id: String,
    pub kind: HandoverKind,
    pub reservation_id: String,
    pub car_sitter_id: String,
    /// Planned handover time
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub status: HandoverStatus,
    pub notes: Option<String>,
    /// Penalty in cents, set when a dropoff is validated
    pub penalty_amount: Option<i64>,
    /// Odometer reading reported on dropoff
    pub current_mileage: Option<i64>,
    pub has_accident: bool,
    pub created_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl HandoverRequest {
    pub fn new(
        kind: HandoverKind,
        reservation_id: impl Into<String>,
        car_sitter_id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        location: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            reservation_id: reservation_id.into(),
            car_sitter_id: car_sitter_id.into(),
            scheduled_at,
            location: location.into(),
            status: HandoverStatus::Pending,
            notes,
            penalty_amount: None,
            current_mileage: None,
            has_accident: false,
            created_at: Utc::now(),
            validated_at: None,
        }
    }

    /// Record the car sitter's decision. A request is decided once.
    pub fn decide(&mut self, validated: bool, notes: Option<String>) -> Result<(), DomainError> {
        if self.status != HandoverStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "{} request {} was already {}",
                self.kind, self.id, self.status
            )));
        }
        self.status = if validated {
            HandoverStatus::Validated
        } else {
            HandoverStatus::Rejected
        };
        if notes.is_some() {
            self.notes = notes;
        }
        self.validated_at = Some(Utc::now());
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup() -> HandoverRequest {
        HandoverRequest::new(HandoverKind::Pickup, "r-1", "cs-1", Utc::now(), "Lyon", None)
    }

    #[test]
    fn decide_once() {
        let mut req = pickup();
        req.decide(true, Some("clean".into())).unwrap();
        assert_eq!(req.status, HandoverStatus::Validated);
        assert_eq!(req.notes.as_deref(), Some("clean"));
        assert!(req.validated_at.is_some());

        // a double click must not be applied twice
        assert!(matches!(req.decide(true, None), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn rejection_keeps_existing_notes_when_none_given() {
        let mut req = HandoverRequest::new(
            HandoverKind::Dropoff,
            "r-1",
            "cs-1",
            Utc::now(),
            "Lyon",
            Some("gate B".into()),
        );
        req.decide(false, None).unwrap();
        assert_eq!(req.status, HandoverStatus::Rejected);
        assert_eq!(req.notes.as_deref(), Some("gate B"));
    }
}
