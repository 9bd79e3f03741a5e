//! Payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::IntentCreated;
use crate::domain::Payment;
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::cents_to_decimal;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: String,
    pub invoice_id: String,
    /// CARD, CASH or BANK_TRANSFER
    pub method: String,
    /// Gateway intent id for card payments, external reference otherwise
    pub transaction_id: Option<String>,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// SUCCESS, FAILED or PENDING
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            invoice_id: p.invoice_id,
            method: p.method.as_str().to_string(),
            transaction_id: p.transaction_id,
            amount: cents_to_decimal(p.amount),
            status: p.status.as_str().to_string(),
            failure_reason: p.failure_reason,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    #[validate(length(min = 1, message = "invoiceId is required"))]
    pub invoice_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentDto {
    pub payment_id: String,
    pub payment_intent_id: String,
    pub client_secret: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
}

impl From<IntentCreated> for PaymentIntentDto {
    fn from(i: IntentCreated) -> Self {
        Self {
            payment_id: i.payment_id,
            payment_intent_id: i.intent_id,
            client_secret: i.client_secret,
            amount: cents_to_decimal(i.amount),
            currency: i.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, message = "paymentIntentId is required"))]
    pub payment_intent_id: String,
}

/// Offline settlement recorded by an admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1, message = "invoiceId is required"))]
    pub invoice_id: String,
    /// CASH, BANK_TRANSFER or CARD
    pub method: String,
    #[validate(length(max = 255))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[validate(length(min = 1, message = "invoiceId is required"))]
    pub invoice_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsParams {
    /// Required for non-admins
    pub invoice_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
