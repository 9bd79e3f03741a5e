//! In-process payment gateway
//!
//! Stands in for a card processor: intents live in a `DashMap`, confirming
//! captures them once. Amounts above `decline_above` (or intents marked with
//! [`SimulatedPaymentGateway::decline`]) are declined.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::application::ports::{GatewayError, GatewayOutcome, PaymentGateway, PaymentIntent};
use crate::infrastructure::crypto::random_token;

#[derive(Debug, Clone, PartialEq, Eq)]
enum IntentState {
    Created,
    Captured,
    Declined(String),
    Refunded,
}

#[derive(Debug, Clone)]
struct SimulatedIntent {
    amount: i64,
    reference: String,
    state: IntentState,
    forced_decline: Option<String>,
}

pub struct SimulatedPaymentGateway {
    intents: DashMap<String, SimulatedIntent>,
    decline_above: Option<i64>,
    captures: AtomicUsize,
}

impl SimulatedPaymentGateway {
    pub fn new() -> Self {
        Self {
            intents: DashMap::new(),
            decline_above: None,
            captures: AtomicUsize::new(0),
        }
    }

    /// Decline every intent whose amount is above `cents`
    pub fn with_decline_above(mut self, cents: i64) -> Self {
        self.decline_above = Some(cents);
        self
    }

    /// Make the next confirmation of `intent_id` fail with `reason`
    pub fn decline(&self, intent_id: &str, reason: &str) -> bool {
        match self.intents.get_mut(intent_id) {
            Some(mut intent) => {
                intent.forced_decline = Some(reason.to_string());
                true
            }
            None => false,
        }
    }

    /// Number of successful captures so far
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        reference: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        if amount <= 0 {
            return Err(GatewayError::Rejected(format!(
                "amount must be positive, got {}",
                amount
            )));
        }

        let id = random_token("pi_", 12);
        let client_secret = format!("{}_secret_{}", id, random_token("", 8));
        self.intents.insert(
            id.clone(),
            SimulatedIntent {
                amount,
                reference: reference.to_string(),
                state: IntentState::Created,
                forced_decline: None,
            },
        );
        debug!(intent_id = %id, amount, reference, "Payment intent created");

        Ok(PaymentIntent {
            id,
            client_secret,
            amount,
            currency: currency.to_uppercase(),
        })
    }

    async fn confirm_intent(&self, intent_id: &str) -> Result<GatewayOutcome, GatewayError> {
        let mut intent = self
            .intents
            .get_mut(intent_id)
            .ok_or_else(|| GatewayError::UnknownIntent(intent_id.to_string()))?;

        match intent.state.clone() {
            IntentState::Captured => Ok(GatewayOutcome::Succeeded),
            IntentState::Declined(reason) => Ok(GatewayOutcome::Declined(reason)),
            IntentState::Refunded => Err(GatewayError::Rejected(format!(
                "intent {} was refunded",
                intent_id
            ))),
            IntentState::Created => {
                let decline = intent.forced_decline.clone().or_else(|| {
                    self.decline_above
                        .filter(|limit| intent.amount > *limit)
                        .map(|_| "card_declined: amount exceeds card limit".to_string())
                });

                if let Some(reason) = decline {
                    warn!(intent_id, reference = %intent.reference, %reason, "Payment declined");
                    intent.state = IntentState::Declined(reason.clone());
                    return Ok(GatewayOutcome::Declined(reason));
                }

                intent.state = IntentState::Captured;
                self.captures.fetch_add(1, Ordering::SeqCst);
                info!(intent_id, amount = intent.amount, "Payment captured");
                Ok(GatewayOutcome::Succeeded)
            }
        }
    }

    async fn refund(&self, intent_id: &str, amount: i64) -> Result<(), GatewayError> {
        let mut intent = self
            .intents
            .get_mut(intent_id)
            .ok_or_else(|| GatewayError::UnknownIntent(intent_id.to_string()))?;

        if intent.state != IntentState::Captured {
            return Err(GatewayError::Rejected(format!(
                "intent {} has not been captured",
                intent_id
            )));
        }
        if amount > intent.amount {
            return Err(GatewayError::Rejected(format!(
                "refund of {} exceeds captured amount {}",
                amount, intent.amount
            )));
        }
        intent.state = IntentState::Refunded;
        info!(intent_id, amount, "Payment refunded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_captures_once() {
        let gateway = SimulatedPaymentGateway::new();
        let intent = gateway.create_intent(5000, "eur", "inv-1").await.unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert_eq!(intent.currency, "EUR");

        assert_eq!(
            gateway.confirm_intent(&intent.id).await.unwrap(),
            GatewayOutcome::Succeeded
        );
        assert_eq!(
            gateway.confirm_intent(&intent.id).await.unwrap(),
            GatewayOutcome::Succeeded
        );
        assert_eq!(gateway.captures(), 1);
    }

    #[tokio::test]
    async fn amounts_above_limit_are_declined() {
        let gateway = SimulatedPaymentGateway::new().with_decline_above(1000);
        let intent = gateway.create_intent(5000, "EUR", "inv-1").await.unwrap();
        let outcome = gateway.confirm_intent(&intent.id).await.unwrap();
        assert!(matches!(outcome, GatewayOutcome::Declined(_)));
        assert_eq!(gateway.captures(), 0);
    }

    #[tokio::test]
    async fn forced_decline_and_unknown_intent() {
        let gateway = SimulatedPaymentGateway::new();
        let intent = gateway.create_intent(100, "EUR", "inv-1").await.unwrap();
        assert!(gateway.decline(&intent.id, "insufficient_funds"));
        assert_eq!(
            gateway.confirm_intent(&intent.id).await.unwrap(),
            GatewayOutcome::Declined("insufficient_funds".into())
        );
        assert!(matches!(
            gateway.confirm_intent("pi_missing").await,
            Err(GatewayError::UnknownIntent(_))
        ));
    }

    #[tokio::test]
    async fn refund_requires_capture() {
        let gateway = SimulatedPaymentGateway::new();
        let intent = gateway.create_intent(100, "EUR", "inv-1").await.unwrap();
        assert!(gateway.refund(&intent.id, 100).await.is_err());
        gateway.confirm_intent(&intent.id).await.unwrap();
        gateway.refund(&intent.id, 100).await.unwrap();
        assert!(gateway.refund(&intent.id, 100).await.is_err());
    }
}
