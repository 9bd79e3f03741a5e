//! Dropoff penalty
//!
//! `max(0, driven - included_per_day * days) * per_km + accident_fee`

use crate::shared::errors::DomainError;

/// Rates applied on dropoff, all money in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyPolicy {
    pub included_km_per_day: i64,
    pub per_km_cents: i64,
    pub accident_fee_cents: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct PenaltyInput {
    /// Odometer when the vehicle left
    pub start_mileage: i64,
    /// Odometer reported on dropoff
    pub end_mileage: i64,
    pub rental_days: i64,
    pub has_accident: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyBreakdown {
    pub driven_km: i64,
    pub included_km: i64,
    pub excess_km: i64,
    pub mileage_penalty: i64,
    pub accident_fee: i64,
    pub total: i64,
}

impl PenaltyPolicy {
    pub fn compute(&self, input: PenaltyInput) -> Result<PenaltyBreakdown, DomainError> {
        let driven_km = input.end_mileage - input.start_mileage;
        if driven_km < 0 {
            return Err(DomainError::Validation(format!(
                "current mileage {} is lower than the recorded mileage {}",
                input.end_mileage, input.start_mileage
            )));
        }
        let days = input.rental_days.max(1);
        let included_km = self.included_km_per_day.saturating_mul(days);
        let excess_km = (driven_km - included_km).max(0);
        let mileage_penalty = excess_km.saturating_mul(self.per_km_cents);
        let accident_fee = if input.has_accident {
            self.accident_fee_cents
        } else {
            0
        };
        Ok(PenaltyBreakdown {
            driven_km,
            included_km,
            excess_km,
            mileage_penalty,
            accident_fee,
            total: mileage_penalty.saturating_add(accident_fee),
        })
    }
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            included_km_per_day: 200,
            per_km_cents: 25,
            accident_fee_cents: 50_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: i64, end: i64, days: i64, accident: bool) -> PenaltyInput {
        PenaltyInput {
            start_mileage: start,
            end_mileage: end,
            rental_days: days,
            has_accident: accident,
        }
    }

    #[test]
    fn within_allowance_costs_nothing() {
        let b = PenaltyPolicy::default().compute(input(1000, 1400, 2, false)).unwrap();
        assert_eq!(b.driven_km, 400);
        assert_eq!(b.excess_km, 0);
        assert_eq!(b.total, 0);
    }

    #[test]
    fn excess_km_and_accident_add_up() {
        let b = PenaltyPolicy::default().compute(input(1000, 1500, 2, true)).unwrap();
        assert_eq!(b.excess_km, 100);
        assert_eq!(b.mileage_penalty, 2500);
        assert_eq!(b.accident_fee, 50_000);
        assert_eq!(b.total, 52_500);
    }

    #[test]
    fn zero_days_count_as_one() {
        let b = PenaltyPolicy::default().compute(input(0, 250, 0, false)).unwrap();
        assert_eq!(b.included_km, 200);
        assert_eq!(b.total, 50 * 25);
    }

    #[test]
    fn negative_distance_is_rejected() {
        let err = PenaltyPolicy::default().compute(input(1000, 900, 1, false)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
