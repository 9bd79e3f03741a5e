//! REST client

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::modules::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::interfaces::http::modules::incidents::{CreateIncidentRequest, IncidentDto};
use crate::interfaces::http::modules::invoices::{CreateInvoiceRequest, InvoiceDto};
use crate::interfaces::http::modules::payments::{
    ConfirmPaymentRequest, CreatePaymentIntentRequest, PaymentDto, PaymentIntentDto,
    IDEMPOTENCY_KEY_HEADER,
};
use crate::interfaces::http::modules::reservations::{
    AvailabilityDto, CheckAvailabilityRequest, CreateReservationRequest, ReservationDto,
    UpdateStatusRequest,
};
use crate::interfaces::http::modules::users::UserDto;
use crate::interfaces::http::modules::vehicles::VehicleDto;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing, expired or rejected credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for one API base URL, e.g. `http://localhost:8080/api/v1`
#[derive(Clone)]
pub struct FlexCarsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl FlexCarsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        decode_envelope(status, &body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    // ── Auth ───────────────────────────────────────────────────

    /// Log in and keep the returned token for later calls
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserDto, ClientError> {
        self.post("/auth/register", request).await
    }

    pub async fn me(&self) -> Result<UserDto, ClientError> {
        self.get("/auth/me").await
    }

    // ── Vehicles ───────────────────────────────────────────────

    pub async fn list_vehicles(&self, page: u32, limit: u32) -> Result<PaginatedResponse<VehicleDto>, ClientError> {
        self.get(&format!("/vehicles?page={}&limit={}", page, limit)).await
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<VehicleDto, ClientError> {
        self.get(&format!("/vehicles/{}", id)).await
    }

    // ── Reservations ───────────────────────────────────────────

    pub async fn check_availability(
        &self,
        request: &CheckAvailabilityRequest,
    ) -> Result<AvailabilityDto, ClientError> {
        self.post("/reservations/check-availability", request).await
    }

    pub async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
    ) -> Result<ReservationDto, ClientError> {
        self.post("/reservations", request).await
    }

    pub async fn list_reservations(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<ReservationDto>, ClientError> {
        self.get(&format!("/reservations?page={}&limit={}", page, limit)).await
    }

    pub async fn get_reservation(&self, id: &str) -> Result<ReservationDto, ClientError> {
        self.get(&format!("/reservations/{}", id)).await
    }

    pub async fn update_reservation_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<ReservationDto, ClientError> {
        let request = UpdateStatusRequest {
            status: status.to_string(),
        };
        self.put(&format!("/reservations/{}/status", id), &request).await
    }

    pub async fn cancel_reservation(&self, id: &str) -> Result<ReservationDto, ClientError> {
        self.post(&format!("/reservations/{}/cancel", id), &serde_json::json!({}))
            .await
    }

    // ── Billing ────────────────────────────────────────────────

    pub async fn create_invoice(&self, reservation_id: &str) -> Result<InvoiceDto, ClientError> {
        let request = CreateInvoiceRequest {
            reservation_id: reservation_id.to_string(),
        };
        self.post("/invoices", &request).await
    }

    pub async fn get_invoice(&self, id: &str) -> Result<InvoiceDto, ClientError> {
        self.get(&format!("/invoices/{}", id)).await
    }

    pub async fn create_payment_intent(&self, invoice_id: &str) -> Result<PaymentIntentDto, ClientError> {
        let request = CreatePaymentIntentRequest {
            invoice_id: invoice_id.to_string(),
        };
        self.post("/payments/create-payment-intent", &request).await
    }

    /// Confirm a card payment. Retries must reuse `idempotency_key`; a
    /// replay returns the original payment instead of charging again.
    pub async fn confirm_payment(
        &self,
        payment_intent_id: &str,
        idempotency_key: &str,
    ) -> Result<PaymentDto, ClientError> {
        let request = ConfirmPaymentRequest {
            payment_intent_id: payment_intent_id.to_string(),
        };
        self.send(
            self.client
                .post(self.url("/payments/confirm-payment"))
                .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
                .json(&request),
        )
        .await
    }

    // ── Incidents / dashboard ──────────────────────────────────

    pub async fn report_incident(&self, request: &CreateIncidentRequest) -> Result<IncidentDto, ClientError> {
        self.post("/incidents", request).await
    }

    /// Dashboard widgets as raw JSON, each `{"status": "ok"|"failed", ...}`
    pub async fn dashboard(&self) -> Result<serde_json::Value, ClientError> {
        self.get("/dashboard").await
    }
}

/// Unwrap `{success, data, error}` or turn it into a [`ClientError`]
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
        debug!(status = status.as_u16(), %message, "API call failed");
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized(message));
        }
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiResponse<T> =
        serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    match envelope.data {
        Some(data) if envelope.success => Ok(data),
        _ => Err(ClientError::Decode(
            envelope
                .error
                .unwrap_or_else(|| "response carried no data".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let body = br#"{"success": true, "data": {"isAvailable": true, "conflicts": []}}"#;
        let dto: AvailabilityDto = decode_envelope(StatusCode::OK, body).unwrap();
        assert!(dto.is_available);
        assert!(dto.message.is_none());
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body = br#"{"success": false, "data": null, "error": "Vehicle not found"}"#;
        let err = decode_envelope::<VehicleDto>(StatusCode::NOT_FOUND, body).unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Vehicle not found");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unauthorized_is_its_own_variant() {
        let body = br#"{"success": false, "data": null, "error": "Invalid or expired token"}"#;
        let err = decode_envelope::<UserDto>(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn non_json_error_body_is_kept_as_text() {
        let err = decode_envelope::<UserDto>(StatusCode::BAD_GATEWAY, b"upstream down\n").unwrap_err();
        assert_eq!(err.to_string(), "API error 502: upstream down");
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = decode_envelope::<UserDto>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = FlexCarsClient::new("http://localhost:8080/api/v1/");
        assert_eq!(client.url("/auth/me"), "http://localhost:8080/api/v1/auth/me");
        assert!(client.token().is_none());
    }
}
