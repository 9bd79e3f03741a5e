//! Invoice DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Invoice;
use crate::interfaces::http::common::{default_limit, default_page};
use crate::shared::cents_to_decimal;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    /// Human-facing number, `INV-yyyymmdd-XXXXXXXX`
    pub number: String,
    pub reservation_id: String,
    pub customer_id: String,
    #[schema(value_type = String, example = "135.00")]
    pub amount: Decimal,
    pub currency: String,
    /// VAT included in `amount`
    #[schema(value_type = String, example = "22.50")]
    pub vat: Decimal,
    #[schema(value_type = String, example = "112.50")]
    pub net: Decimal,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    /// PAID, UNPAID, OVERDUE, REFUNDED or CANCELLED
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDto {
    fn from(i: Invoice) -> Self {
        let totals = i.totals();
        Self {
            amount: cents_to_decimal(i.amount),
            vat: totals.vat,
            net: totals.net,
            id: i.id,
            number: i.number,
            reservation_id: i.reservation_id,
            customer_id: i.customer_id,
            currency: i.currency,
            due_date: i.due_date,
            paid_at: i.paid_at,
            status: i.status.as_str().to_string(),
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "reservationId is required"))]
    pub reservation_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesParams {
    pub status: Option<String>,
    /// Admin only; customers always see their own
    pub customer_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
