//! Reservation pricing

use chrono::{DateTime, Utc};

use super::model::rental_days;

/// Total price in cents: daily rate times billable days, plus the car-sitting
/// fee when the option is selected.
pub fn quote_total(
    price_per_day: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    car_sitting_option: bool,
    car_sitting_fee: i64,
) -> i64 {
    let base = price_per_day.saturating_mul(rental_days(start, end));
    if car_sitting_option {
        base.saturating_add(car_sitting_fee)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn quote_multiplies_days_and_adds_fee() {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 12, 10, 0, 0).unwrap();
        assert_eq!(quote_total(4500, start, end, false, 2500), 9000);
        assert_eq!(quote_total(4500, start, end, true, 2500), 11500);
    }
}
