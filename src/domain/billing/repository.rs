//! Invoice and payment repository interfaces

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::invoice::{Invoice, InvoiceStatus};
use super::payment::Payment;
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<String>,
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn save(&self, invoice: Invoice) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Invoice>>;
    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Invoice>>;
    async fn update(&self, invoice: Invoice) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &InvoiceFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Invoice>>;

    /// UNPAID invoices whose due date is before `now`
    async fn find_past_due(&self, now: DateTime<Utc>) -> DomainResult<Vec<Invoice>>;

    /// Sum of PAID invoice amounts, in cents
    async fn sum_paid(&self) -> DomainResult<i64>;

    /// Count and cents of UNPAID + OVERDUE invoices
    async fn outstanding(&self) -> DomainResult<(u64, i64)>;
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub invoice_id: Option<String>,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: Payment) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>>;
    async fn find_by_transaction_id(&self, transaction_id: &str) -> DomainResult<Option<Payment>>;
    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<Payment>>;

    /// The SUCCESS payment of an invoice, if any
    async fn find_successful_for_invoice(&self, invoice_id: &str) -> DomainResult<Option<Payment>>;

    async fn update(&self, payment: Payment) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &PaymentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Payment>>;
}
