//! Incident domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

str_enum! {
    pub enum IncidentSeverity {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

str_enum! {
    pub enum IncidentStatus {
        Open => "OPEN",
        Resolved => "RESOLVED",
    }
}

/// Damage or accident report against a vehicle
#[derive(Debug, Clone)]
pub struct Incident {
    pub id: String,
    pub vehicle_id: String,
    pub reservation_id: Option<String>,
    pub reported_by: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Incident {
    pub fn new(
        vehicle_id: impl Into<String>,
        reservation_id: Option<String>,
        reported_by: impl Into<String>,
        description: impl Into<String>,
        severity: IncidentSeverity,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vehicle_id: vehicle_id.into(),
            reservation_id,
            reported_by: reported_by.into(),
            description: description.into(),
            severity,
            status: IncidentStatus::Open,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    pub fn resolve(&mut self) -> Result<(), DomainError> {
        if self.status == IncidentStatus::Resolved {
            return Err(DomainError::Conflict(format!(
                "Incident {} is already resolved",
                self.id
            )));
        }
        self.status = IncidentStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_one_shot() {
        let mut i = Incident::new("v-1", None, "u-1", "scratch", IncidentSeverity::Low);
        assert_eq!(i.status, IncidentStatus::Open);
        i.resolve().unwrap();
        assert!(i.resolved_at.is_some());
        assert!(matches!(i.resolve(), Err(DomainError::Conflict(_))));
    }
}
