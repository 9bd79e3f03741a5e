//! Payment use cases
//!
//! Card payments use the gateway's two-phase handshake: an intent is opened
//! for an invoice, then confirmed with a client-chosen idempotency key. A
//! replayed key returns the stored payment and never reaches the gateway.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::reservation::sync_vehicle_status;
use crate::application::ports::{GatewayOutcome, PaymentGateway};
use crate::application::Actor;
use crate::domain::billing::{
    Invoice, InvoiceStatus, Payment, PaymentFilter, PaymentMethod, PaymentStatus,
};
use crate::domain::reservation::ReservationStatus;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

/// Longest accepted `Idempotency-Key`
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

#[derive(Debug, Clone)]
pub struct IntentCreated {
    pub payment_id: String,
    pub intent_id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct OfflinePayment {
    pub invoice_id: String,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
}

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    confirm_lock: Mutex<()>,
}

impl PaymentService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        currency: String,
    ) -> Self {
        Self {
            repos,
            gateway,
            currency,
            confirm_lock: Mutex::new(()),
        }
    }

    async fn load_invoice(&self, id: &str) -> DomainResult<Invoice> {
        self.repos
            .invoices()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Invoice", id))
    }

    /// Money is only taken for an open invoice whose reservation is still
    /// PENDING or CONFIRMED.
    async fn ensure_not_settled(&self, invoice: &Invoice) -> DomainResult<()> {
        invoice.ensure_payable()?;
        if let Some(reservation) = self
            .repos
            .reservations()
            .find_by_id(&invoice.reservation_id)
            .await?
        {
            if !matches!(
                reservation.status,
                ReservationStatus::Pending | ReservationStatus::Confirmed
            ) {
                return Err(DomainError::Conflict(format!(
                    "Reservation {} is {}; invoice {} cannot be paid",
                    reservation.id, reservation.status, invoice.number
                )));
            }
        }
        if self
            .repos
            .payments()
            .find_successful_for_invoice(&invoice.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Invoice {} already has a successful payment",
                invoice.number
            )));
        }
        Ok(())
    }

    pub async fn create_intent(&self, actor: &Actor, invoice_id: &str) -> DomainResult<IntentCreated> {
        let invoice = self.load_invoice(invoice_id).await?;
        actor.require_owner_or_admin(&invoice.customer_id, "invoice")?;
        self.ensure_not_settled(&invoice).await?;

        let currency = if invoice.currency.is_empty() {
            self.currency.clone()
        } else {
            invoice.currency.clone()
        };
        let intent = self
            .gateway
            .create_intent(invoice.amount, &currency, &invoice.id)
            .await?;

        let payment = Payment::new(
            &invoice.id,
            PaymentMethod::Card,
            Some(intent.id.clone()),
            intent.amount,
        );
        self.repos.payments().save(payment.clone()).await?;

        info!(
            invoice_id = %invoice.id,
            intent_id = %intent.id,
            amount_cents = intent.amount,
            "💳 Payment intent created"
        );
        Ok(IntentCreated {
            payment_id: payment.id,
            intent_id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
        })
    }

    /// Confirm a card payment.
    ///
    /// Returns the payment in its final state. A declined payment comes back
    /// as `FAILED` rather than as an error so replays see the same result.
    pub async fn confirm(
        &self,
        actor: &Actor,
        intent_id: &str,
        idempotency_key: &str,
    ) -> DomainResult<Payment> {
        let key = idempotency_key.trim();
        if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(DomainError::Validation(format!(
                "Idempotency-Key must be 1..={} characters",
                MAX_IDEMPOTENCY_KEY_LEN
            )));
        }

        let _guard = self.confirm_lock.lock().await;

        if let Some(stored) = self.repos.payments().find_by_idempotency_key(key).await? {
            if stored.transaction_id.as_deref() != Some(intent_id) {
                return Err(DomainError::Conflict(
                    "Idempotency-Key was already used for another payment".into(),
                ));
            }
            let invoice = self.load_invoice(&stored.invoice_id).await?;
            actor.require_owner_or_admin(&invoice.customer_id, "payment")?;
            info!(payment_id = %stored.id, "Idempotent replay of payment confirmation");
            return Ok(stored);
        }

        let mut payment = self
            .repos
            .payments()
            .find_by_transaction_id(intent_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "PaymentIntent",
                field: "id",
                value: intent_id.to_string(),
            })?;
        let invoice = self.load_invoice(&payment.invoice_id).await?;
        actor.require_owner_or_admin(&invoice.customer_id, "payment")?;

        match payment.status {
            PaymentStatus::Success => return Ok(payment),
            PaymentStatus::Failed => {
                return Err(DomainError::Conflict(format!(
                    "Payment intent {} was declined; create a new payment intent",
                    intent_id
                )))
            }
            PaymentStatus::Pending => {}
        }
        self.ensure_not_settled(&invoice).await?;

        let outcome = self.gateway.confirm_intent(intent_id).await?;
        payment.idempotency_key = Some(key.to_string());
        match outcome {
            GatewayOutcome::Succeeded => {
                payment.succeed();
                self.repos.payments().update(payment.clone()).await?;
                self.settle(invoice).await?;
                metrics::counter!("flexcars_payments_total", "status" => "success").increment(1);
                info!(payment_id = %payment.id, intent_id, "✅ Payment confirmed");
            }
            GatewayOutcome::Declined(reason) => {
                payment.fail(reason.clone());
                self.repos.payments().update(payment.clone()).await?;
                metrics::counter!("flexcars_payments_total", "status" => "failed").increment(1);
                warn!(payment_id = %payment.id, intent_id, %reason, "❌ Payment declined");
            }
        }
        Ok(payment)
    }

    /// Record a settlement made outside the card flow (cash, bank transfer).
    pub async fn record_offline(&self, actor: &Actor, input: OfflinePayment) -> DomainResult<Payment> {
        actor.require_admin()?;
        let invoice = self.load_invoice(&input.invoice_id).await?;
        self.ensure_not_settled(&invoice).await?;

        if let Some(tx) = input.transaction_id.as_deref() {
            if self.repos.payments().find_by_transaction_id(tx).await?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "Transaction {} is already recorded",
                    tx
                )));
            }
        }

        let mut payment = Payment::new(&invoice.id, input.method, input.transaction_id, invoice.amount);
        payment.succeed();
        self.repos.payments().save(payment.clone()).await?;
        self.settle(invoice).await?;

        info!(
            payment_id = %payment.id,
            method = %payment.method,
            amount_cents = payment.amount,
            "Offline payment recorded"
        );
        Ok(payment)
    }

    /// Mark the invoice PAID and confirm its reservation.
    async fn settle(&self, mut invoice: Invoice) -> DomainResult<()> {
        invoice.mark_paid(Utc::now())?;
        self.repos.invoices().update(invoice.clone()).await?;

        let Some(mut reservation) = self
            .repos
            .reservations()
            .find_by_id(&invoice.reservation_id)
            .await?
        else {
            warn!(invoice_id = %invoice.id, "Paid invoice has no reservation");
            return Ok(());
        };
        if reservation.status == ReservationStatus::Pending {
            reservation.transition_to(ReservationStatus::Confirmed)?;
            self.repos.reservations().update(reservation.clone()).await?;
            sync_vehicle_status(self.repos.as_ref(), &reservation).await?;
        }
        Ok(())
    }

    /// Refund a PAID invoice; its CONFIRMED reservation is cancelled.
    pub async fn refund_by_invoice(&self, actor: &Actor, invoice_id: &str) -> DomainResult<Invoice> {
        actor.require_admin()?;
        let mut invoice = self.load_invoice(invoice_id).await?;
        if invoice.status != InvoiceStatus::Paid {
            return Err(DomainError::Conflict(format!(
                "Only PAID invoices can be refunded (invoice {} is {})",
                invoice.number, invoice.status
            )));
        }

        let payment = self
            .repos
            .payments()
            .find_successful_for_invoice(&invoice.id)
            .await?;
        if let Some(payment) = &payment {
            if payment.method == PaymentMethod::Card {
                if let Some(intent_id) = payment.transaction_id.as_deref() {
                    self.gateway.refund(intent_id, payment.amount).await?;
                }
            }
        }

        invoice.mark_refunded()?;
        self.repos.invoices().update(invoice.clone()).await?;

        if let Some(mut reservation) = self
            .repos
            .reservations()
            .find_by_id(&invoice.reservation_id)
            .await?
        {
            if reservation.status == ReservationStatus::Confirmed {
                reservation.transition_to(ReservationStatus::Cancelled)?;
                self.repos.reservations().update(reservation.clone()).await?;
                sync_vehicle_status(self.repos.as_ref(), &reservation).await?;
            }
        }

        info!(invoice_id = %invoice.id, amount_cents = invoice.amount, "↩️ Invoice refunded");
        Ok(invoice)
    }

    /// Admins list everything; customers only the payments of one of their
    /// invoices.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: PaymentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Payment>> {
        if !actor.is_admin() {
            let Some(invoice_id) = filter.invoice_id.as_deref() else {
                return Err(DomainError::Forbidden(
                    "invoice_id is required to list payments".into(),
                ));
            };
            let invoice = self.load_invoice(invoice_id).await?;
            actor.require_owner_or_admin(&invoice.customer_id, "invoice")?;
        }
        self.repos.payments().list(&filter, params).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
