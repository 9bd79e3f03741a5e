//! Billing aggregate
//!
//! Invoices (one per reservation) and the payments that settle them.

pub mod invoice;
pub mod payment;
pub mod repository;

pub use invoice::{Invoice, InvoiceStatus, InvoiceTotals, VAT_RATE_PERCENT};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use repository::{InvoiceFilter, InvoiceRepository, PaymentFilter, PaymentRepository};
