//! Outbound ports
//!
//! [`PaymentGateway`] is the two-phase card handshake (create intent, then
//! confirm) plus refunds. [`DocumentStore`] keeps uploaded document files.
//! Adapters live in `infrastructure::payment` and `infrastructure::storage`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DomainError, DomainResult};

/// A payment intent as returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret the front end uses to complete the card flow
    pub client_secret: String,
    /// Cents
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Succeeded,
    Declined(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unknown payment intent: {0}")]
    UnknownIntent(String),

    #[error("Operation rejected by the gateway: {0}")]
    Rejected(String),

    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
}

impl From<GatewayError> for DomainError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::UnknownIntent(id) => DomainError::NotFound {
                entity: "PaymentIntent",
                field: "id",
                value: id,
            },
            GatewayError::Rejected(msg) => DomainError::Conflict(msg),
            GatewayError::Unavailable(msg) => {
                DomainError::Storage(format!("payment gateway unavailable: {}", msg))
            }
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open an intent for `amount` cents. `reference` is our invoice id.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        reference: &str,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Capture an intent. Confirming an already captured intent reports
    /// success again without charging twice.
    async fn confirm_intent(&self, intent_id: &str) -> Result<GatewayOutcome, GatewayError>;

    async fn refund(&self, intent_id: &str, amount: i64) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` and return the generated storage name
    async fn put(&self, extension: Option<&str>, bytes: &[u8]) -> DomainResult<String>;
    async fn read(&self, name: &str) -> DomainResult<Vec<u8>>;
    /// Remove a stored file. Removing a missing file is not an error.
    async fn delete(&self, name: &str) -> DomainResult<()>;
}
