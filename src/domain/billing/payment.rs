//! Payment domain entity

use chrono::{DateTime, Utc};

str_enum! {
    pub enum PaymentStatus {
        Success => "SUCCESS",
        Failed => "FAILED",
        /// Intent created, not confirmed yet
        Pending => "PENDING",
    }
}

str_enum! {
    pub enum PaymentMethod {
        Card => "CARD",
        Cash => "CASH",
        BankTransfer => "BANK_TRANSFER",
    }
}

/// A settlement attempt for an invoice
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub method: PaymentMethod,
    /// Gateway intent id for card payments, external reference otherwise
    pub transaction_id: Option<String>,
    /// Amount in cents
    pub amount: i64,
    pub status: PaymentStatus,
    /// Key of the confirmation request that produced the final status
    pub idempotency_key: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        invoice_id: impl Into<String>,
        method: PaymentMethod,
        transaction_id: Option<String>,
        amount: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id: invoice_id.into(),
            method,
            transaction_id,
            amount,
            status: PaymentStatus::Pending,
            idempotency_key: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn succeed(&mut self) {
        self.status = PaymentStatus::Success;
        self.failure_reason = None;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = PaymentStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.updated_at = Utc::now();
    }

    pub fn is_final(&self) -> bool {
        self.status != PaymentStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_outcomes() {
        let mut p = Payment::new("i-1", PaymentMethod::Card, Some("pi_1".into()), 500);
        assert!(!p.is_final());
        p.fail("card declined");
        assert_eq!(p.status, PaymentStatus::Failed);
        assert_eq!(p.failure_reason.as_deref(), Some("card declined"));
        p.succeed();
        assert!(p.failure_reason.is_none());
        assert!(p.is_final());
    }

    #[test]
    fn method_parses_wire_names() {
        assert_eq!("bank_transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
        assert_eq!(PaymentMethod::Cash.to_string(), "CASH");
    }
}
