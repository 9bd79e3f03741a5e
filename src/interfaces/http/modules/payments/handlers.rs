//! Payment API handlers
//!
//! Card payments are a two-step handshake: create an intent for an invoice,
//! then confirm it. Confirmation requires an `Idempotency-Key` header; a
//! replay with the same key returns the stored outcome without charging
//! again.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};

use super::dto::{
    ConfirmPaymentRequest, CreatePaymentIntentRequest, ListPaymentsParams, PaymentDto,
    PaymentIntentDto, RecordPaymentRequest, RefundRequest,
};
use crate::application::{AppServices, OfflinePayment};
use crate::domain::billing::PaymentFilter;
use crate::domain::PaymentStatus;
use crate::interfaces::http::common::{
    page_params, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::invoices::InvoiceDto;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

#[utoipa::path(
    post,
    path = "/api/v1/payments/create-payment-intent",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 201, description = "Intent created, payment PENDING", body = ApiResponse<PaymentIntentDto>),
        (status = 409, description = "Invoice already settled")
    )
)]
pub async fn create_payment_intent(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreatePaymentIntentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PaymentIntentDto>>)> {
    let intent = services
        .payments
        .create_intent(&user.actor(), &request.invoice_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PaymentIntentDto::from(intent))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/confirm-payment",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("Idempotency-Key" = String, Header, description = "Client-generated key, stable across retries")),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment succeeded", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Missing Idempotency-Key"),
        (status = 402, description = "Payment declined", body = ApiResponse<PaymentDto>),
        (status = 409, description = "Key reused for another intent, or intent already declined")
    )
)]
pub async fn confirm_payment(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<ConfirmPaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PaymentDto>>)> {
    let key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Idempotency-Key header is required"))?;

    let payment = services
        .payments
        .confirm(&user.actor(), &request.payment_intent_id, key)
        .await?;

    if payment.status == PaymentStatus::Failed {
        let reason = payment
            .failure_reason
            .clone()
            .unwrap_or_else(|| "declined".to_string());
        let body = ApiResponse {
            success: false,
            data: Some(PaymentDto::from(payment)),
            error: Some(format!("Payment declined: {}", reason)),
        };
        return Ok((StatusCode::PAYMENT_REQUIRED, Json(body)));
    }
    Ok((StatusCode::OK, Json(ApiResponse::success(PaymentDto::from(payment)))))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Offline payment recorded, invoice PAID", body = ApiResponse<PaymentDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Invoice already settled")
    )
)]
pub async fn record_payment(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PaymentDto>>)> {
    let input = OfflinePayment {
        invoice_id: request.invoice_id,
        method: request.method.parse()?,
        transaction_id: request.transaction_id,
    };
    let payment = services.payments.record_offline(&user.actor(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PaymentDto::from(payment))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/refund-by-invoice",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Invoice refunded", body = ApiResponse<InvoiceDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Invoice is not PAID")
    )
)]
pub async fn refund_by_invoice(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RefundRequest>,
) -> ApiResult<Json<ApiResponse<InvoiceDto>>> {
    let invoice = services
        .payments
        .refund_by_invoice(&user.actor(), &request.invoice_id)
        .await?;
    Ok(Json(ApiResponse::success(InvoiceDto::from(invoice))))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(ListPaymentsParams),
    responses(
        (status = 200, description = "Payments", body = ApiResponse<PaginatedResponse<PaymentDto>>),
        (status = 403, description = "invoiceId required for non-admins")
    )
)]
pub async fn list_payments(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListPaymentsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<PaymentDto>>>> {
    let filter = PaymentFilter {
        invoice_id: params.invoice_id,
    };
    let page = services
        .payments
        .list(&user.actor(), filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        PaymentDto::from,
    ))))
}
