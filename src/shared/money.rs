//! Money helpers
//!
//! Amounts are stored as integer minor units (cents) and exposed on the
//! wire as `rust_decimal::Decimal` with two fractional digits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::errors::DomainError;

/// Convert cents to a two-digit decimal amount.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a decimal amount to cents, rounding half away from zero.
///
/// Negative amounts and values beyond `i64` cents are rejected.
pub fn decimal_to_cents(amount: Decimal) -> Result<i64, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::Validation(format!(
            "amount must not be negative: {}",
            amount
        )));
    }
    let scaled = (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    scaled
        .to_i64()
        .ok_or_else(|| DomainError::Validation(format!("amount out of range: {}", amount)))
}

/// Format cents as `"12.34 EUR"`.
pub fn format_cents(cents: i64, currency: &str) -> String {
    format!("{} {}", cents_to_decimal(cents), currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_roundtrip_keeps_two_digits() {
        assert_eq!(cents_to_decimal(12345).to_string(), "123.45");
        assert_eq!(cents_to_decimal(5).to_string(), "0.05");
    }

    #[test]
    fn decimal_to_cents_rounds_half_away_from_zero() {
        assert_eq!(decimal_to_cents(Decimal::from_str("49.995").unwrap()).unwrap(), 5000);
        assert_eq!(decimal_to_cents(Decimal::from_str("10").unwrap()).unwrap(), 1000);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = decimal_to_cents(Decimal::from_str("-1.00").unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn format_appends_currency() {
        assert_eq!(format_cents(250000, "EUR"), "2500.00 EUR");
    }
}
