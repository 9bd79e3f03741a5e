//! Invoice domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::shared::errors::DomainError;

/// VAT rate included in every invoice total
pub const VAT_RATE_PERCENT: u32 = 20;

str_enum! {
    pub enum InvoiceStatus {
        Paid => "PAID",
        Unpaid => "UNPAID",
        /// Unpaid past its due date
        Overdue => "OVERDUE",
        Refunded => "REFUNDED",
        /// Voided because its reservation was cancelled before payment
        Cancelled => "CANCELLED",
    }
}

impl InvoiceStatus {
    /// Whether a payment may still be taken against the invoice
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Unpaid | Self::Overdue)
    }
}

/// Billing record for one reservation
#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: String,
    /// Human readable number, `INV-yyyymmdd-xxxxxxxx`
    pub number: String,
    pub reservation_id: String,
    pub customer_id: String,
    /// Amount in cents, VAT included
    pub amount: i64,
    pub currency: String,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        reservation_id: impl Into<String>,
        customer_id: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        due_in_days: i64,
    ) -> Self {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let number = Self::make_number(now, &id);
        Self {
            id,
            number,
            reservation_id: reservation_id.into(),
            customer_id: customer_id.into(),
            amount,
            currency: currency.into(),
            due_date: now + Duration::days(due_in_days),
            paid_at: None,
            status: InvoiceStatus::Unpaid,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_number(now: DateTime<Utc>, id: &str) -> String {
        let suffix: String = id.chars().filter(|c| *c != '-').take(8).collect();
        format!("INV-{}-{}", now.format("%Y%m%d"), suffix.to_uppercase())
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.status == InvoiceStatus::Unpaid && self.due_date < now
    }

    pub fn ensure_payable(&self) -> Result<(), DomainError> {
        if !self.status.is_payable() {
            return Err(DomainError::Conflict(format!(
                "Invoice {} is {} and cannot be paid",
                self.number, self.status
            )));
        }
        Ok(())
    }

    /// Settle the invoice. Only payable invoices can be settled.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_payable()?;
        self.status = InvoiceStatus::Paid;
        self.paid_at = Some(at);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_overdue(&mut self) -> Result<(), DomainError> {
        if self.status != InvoiceStatus::Unpaid {
            return Err(DomainError::Conflict(format!(
                "Invoice {} is {} and cannot become OVERDUE",
                self.number, self.status
            )));
        }
        self.status = InvoiceStatus::Overdue;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_refunded(&mut self) -> Result<(), DomainError> {
        if self.status != InvoiceStatus::Paid {
            return Err(DomainError::Conflict(format!(
                "Only PAID invoices can be refunded (invoice {} is {})",
                self.number, self.status
            )));
        }
        self.status = InvoiceStatus::Refunded;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Void an invoice that was never paid.
    pub fn void(&mut self) -> Result<(), DomainError> {
        self.ensure_payable()?;
        self.status = InvoiceStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from_amounts(None, Some(crate::shared::cents_to_decimal(self.amount)))
    }
}

/// Display totals of an invoice, VAT included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub total: Decimal,
    pub vat: Decimal,
    pub net: Decimal,
}

impl InvoiceTotals {
    /// `total` wins over `amount`; missing both yields zero.
    pub fn from_amounts(total: Option<Decimal>, amount: Option<Decimal>) -> Self {
        let total = total.or(amount).unwrap_or(Decimal::ZERO);
        let rate = Decimal::from(VAT_RATE_PERCENT) / Decimal::ONE_HUNDRED;
        let vat = (total * rate / (Decimal::ONE + rate))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            total,
            vat,
            net: total - vat,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn new_invoice_is_unpaid_with_number() {
        let inv = Invoice::new("r-1", "c-1", 12000, "EUR", 7);
        assert_eq!(inv.status, InvoiceStatus::Unpaid);
        assert!(inv.number.starts_with("INV-"));
        assert_eq!(inv.number.len(), "INV-20250101-ABCDEF12".len());
        assert!(inv.due_date > inv.created_at);
    }

    #[test]
    fn display_total_prefers_total_then_amount_then_zero() {
        assert_eq!(InvoiceTotals::from_amounts(Some(dec("120")), Some(dec("50"))).total, dec("120"));
        assert_eq!(InvoiceTotals::from_amounts(None, Some(dec("50"))).total, dec("50"));
        assert_eq!(InvoiceTotals::from_amounts(None, None).total, Decimal::ZERO);
    }

    #[test]
    fn vat_is_one_sixth_of_inclusive_total() {
        let t = InvoiceTotals::from_amounts(Some(dec("120.00")), None);
        assert_eq!(t.vat, dec("20.00"));
        assert_eq!(t.net, dec("100.00"));

        let t = InvoiceTotals::from_amounts(Some(dec("100.00")), None);
        assert_eq!(t.vat, dec("16.67"));
        assert_eq!(t.net, dec("83.33"));
    }

    #[test]
    fn paid_requires_payable_status() {
        let mut inv = Invoice::new("r-1", "c-1", 1000, "EUR", 7);
        inv.mark_paid(Utc::now()).unwrap();
        assert!(inv.paid_at.is_some());
        assert!(matches!(inv.mark_paid(Utc::now()), Err(DomainError::Conflict(_))));
        inv.mark_refunded().unwrap();
        assert_eq!(inv.status, InvoiceStatus::Refunded);
        assert!(inv.mark_refunded().is_err());
    }

    #[test]
    fn overdue_invoice_can_still_be_paid() {
        let mut inv = Invoice::new("r-1", "c-1", 1000, "EUR", -1);
        assert!(inv.is_past_due(Utc::now()));
        inv.mark_overdue().unwrap();
        assert!(inv.status.is_payable());
        inv.mark_paid(Utc::now()).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn voided_invoice_is_no_longer_payable() {
        let mut inv = Invoice::new("r-1", "c-1", 1000, "EUR", 7);
        inv.void().unwrap();
        assert_eq!(inv.status, InvoiceStatus::Cancelled);
        assert!(matches!(inv.mark_paid(Utc::now()), Err(DomainError::Conflict(_))));

        let mut paid = Invoice::new("r-1", "c-1", 1000, "EUR", 7);
        paid.mark_paid(Utc::now()).unwrap();
        assert!(paid.void().is_err());
    }

    #[test]
    fn totals_from_cents() {
        let inv = Invoice::new("r-1", "c-1", 12000, "EUR", 7);
        assert_eq!(inv.totals().vat, dec("20.00"));
    }
}
