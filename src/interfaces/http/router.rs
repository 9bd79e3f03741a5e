//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AppServices;
use crate::config::AppConfig;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::health::{ComponentHealth, HealthResponse, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    auth, car_sitters, dashboard, documents, health, incidents, invoices, payments, reservations,
    users, vehicles,
};
use crate::interfaces::http::rate_limit::{login_rate_limit_middleware, LoginRateLimiter};

/// Multipart framing on top of the file itself
const UPLOAD_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::list_car_sitters,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        vehicles::calculate_penalty,
        // Reservations
        reservations::check_availability,
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::reservation_stats,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::update_reservation_status,
        reservations::cancel_reservation,
        reservations::delete_reservation,
        // Invoices
        invoices::create_invoice,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::download_invoice,
        invoices::view_invoice,
        // Payments
        payments::create_payment_intent,
        payments::confirm_payment,
        payments::record_payment,
        payments::refund_by_invoice,
        payments::list_payments,
        // Car sitters
        car_sitters::create_pickup_request,
        car_sitters::list_pickup_requests,
        car_sitters::create_dropoff_request,
        car_sitters::list_dropoff_requests,
        car_sitters::validate_pickup,
        car_sitters::validate_dropoff,
        // Documents
        documents::create_document,
        documents::upload_document,
        documents::list_documents,
        documents::get_document,
        documents::get_document_file,
        documents::update_document,
        documents::delete_document,
        // Incidents
        incidents::create_incident,
        incidents::list_incidents,
        incidents::get_incident,
        incidents::resolve_incident,
        // Dashboard
        dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            HealthResponse,
            ComponentHealth,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<vehicles::VehicleDto>,
            PaginatedResponse<reservations::ReservationDto>,
            PaginatedResponse<invoices::InvoiceDto>,
            PaginatedResponse<payments::PaymentDto>,
            PaginatedResponse<car_sitters::HandoverDto>,
            PaginatedResponse<documents::DocumentDto>,
            PaginatedResponse<incidents::IncidentDto>,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            // Users
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Vehicles
            vehicles::VehicleDto,
            vehicles::CreateVehicleRequest,
            vehicles::UpdateVehicleRequest,
            vehicles::CalculatePenaltyRequest,
            vehicles::PenaltyDto,
            // Reservations
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationRequest,
            reservations::UpdateStatusRequest,
            reservations::CheckAvailabilityRequest,
            reservations::AvailabilityDto,
            reservations::ReservationStatsDto,
            // Billing
            invoices::InvoiceDto,
            invoices::CreateInvoiceRequest,
            payments::PaymentDto,
            payments::CreatePaymentIntentRequest,
            payments::PaymentIntentDto,
            payments::ConfirmPaymentRequest,
            payments::RecordPaymentRequest,
            payments::RefundRequest,
            // Car sitters
            car_sitters::HandoverDto,
            car_sitters::CreateHandoverRequest,
            car_sitters::ValidatePickupRequest,
            car_sitters::ValidateDropoffRequest,
            // Documents
            documents::DocumentDto,
            documents::CreateDocumentRequest,
            documents::UpdateDocumentRequest,
            documents::UploadDocumentForm,
            // Incidents
            incidents::IncidentDto,
            incidents::CreateIncidentRequest,
            // Dashboard
            dashboard::DashboardDto,
            dashboard::OutstandingInvoicesDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login (JWT), registration, password change"),
        (name = "Users", description = "User administration"),
        (name = "Vehicles", description = "Fleet catalogue and penalty estimates"),
        (name = "Reservations", description = "Bookings, availability and the reservation lifecycle"),
        (name = "Invoices", description = "Invoices and printable invoice documents"),
        (name = "Payments", description = "Card payments, offline settlements and refunds"),
        (name = "Car Sitters", description = "Vehicle pickup and dropoff handovers"),
        (name = "Documents", description = "Customer documents: licences, IDs, proofs of address"),
        (name = "Incidents", description = "Damage and breakdown reports"),
        (name = "Dashboard", description = "Admin overview"),
    ),
    info(
        title = "FlexCars API",
        version = "1.0.0",
        description = "REST API for the FlexCars car rental platform",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Router settings taken from the configuration
#[derive(Clone)]
pub struct RouterOptions {
    pub jwt_config: JwtConfig,
    /// Allowed CORS origins, empty means any
    pub cors_origins: Vec<String>,
    pub login_per_minute: u32,
    pub max_upload_bytes: u64,
    /// Scrape handle, `/metrics` is only mounted when present
    pub metrics: Option<PrometheusHandle>,
}

impl RouterOptions {
    pub fn from_config(config: &AppConfig, jwt_config: JwtConfig) -> Self {
        Self {
            jwt_config,
            cors_origins: config.server.cors_origins.clone(),
            login_per_minute: config.rate_limit.login_per_minute,
            max_upload_bytes: config.uploads.max_file_size_bytes(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

/// Create the API router with all routes
pub fn create_api_router(
    services: AppServices,
    db: DatabaseConnection,
    options: RouterOptions,
) -> Router {
    let auth_state = AuthState {
        jwt_config: options.jwt_config.clone(),
    };
    let limiter = LoginRateLimiter::new(options.login_per_minute);
    let upload_limit = usize::try_from(options.max_upload_bytes + UPLOAD_OVERHEAD_BYTES)
        .unwrap_or(usize::MAX);

    // Auth routes (public)
    let public_routes = Router::new()
        .route(
            "/api/v1/auth/login",
            post(auth::login).layer(middleware::from_fn_with_state(
                limiter,
                login_rate_limit_middleware,
            )),
        )
        .route("/api/v1/auth/register", post(auth::register));

    // Everything else needs a bearer token
    let protected_routes = Router::new()
        // Auth
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/auth/change-password", put(auth::change_password))
        // Users
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/v1/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Vehicles
        .route(
            "/api/v1/vehicles",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/api/v1/vehicles/{id}",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/v1/vehicles/{id}/calculate-penalty",
            post(vehicles::calculate_penalty),
        )
        // Reservations
        .route(
            "/api/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/reservations/check-availability",
            post(reservations::check_availability),
        )
        .route("/api/v1/reservations/stats", get(reservations::reservation_stats))
        .route(
            "/api/v1/reservations/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/status",
            put(reservations::update_reservation_status),
        )
        .route(
            "/api/v1/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        // Invoices
        .route(
            "/api/v1/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/api/v1/invoices/{id}", get(invoices::get_invoice))
        .route("/api/v1/invoices/{id}/download", get(invoices::download_invoice))
        .route("/api/v1/invoices/{id}/view", get(invoices::view_invoice))
        // Payments
        .route(
            "/api/v1/payments",
            get(payments::list_payments).post(payments::record_payment),
        )
        .route(
            "/api/v1/payments/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route(
            "/api/v1/payments/confirm-payment",
            post(payments::confirm_payment),
        )
        .route(
            "/api/v1/payments/refund-by-invoice",
            post(payments::refund_by_invoice),
        )
        // Car sitters
        .route("/api/v1/car-sitters", get(users::list_car_sitters))
        .route(
            "/api/v1/car-sitters/pickup-requests",
            get(car_sitters::list_pickup_requests).post(car_sitters::create_pickup_request),
        )
        .route(
            "/api/v1/car-sitters/dropoff-requests",
            get(car_sitters::list_dropoff_requests).post(car_sitters::create_dropoff_request),
        )
        .route(
            "/api/v1/car-sitters/validate-pickup",
            post(car_sitters::validate_pickup),
        )
        .route(
            "/api/v1/car-sitters/validate-dropoff",
            post(car_sitters::validate_dropoff),
        )
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/api/v1/documents/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/documents/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route("/api/v1/documents/{id}/file", get(documents::get_document_file))
        // Incidents
        .route(
            "/api/v1/incidents",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route("/api/v1/incidents/{id}", get(incidents::get_incident))
        .route(
            "/api/v1/incidents/{id}/resolve",
            post(incidents::resolve_incident),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(public_routes.merge(protected_routes).with_state(services));

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::services::testing;
    use crate::domain::UserRole;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::database::test_database;
    use crate::infrastructure::{LocalDocumentStore, SeaOrmRepositoryProvider, SimulatedPaymentGateway};

    struct TestApp {
        router: Router,
        services: AppServices,
        jwt: JwtConfig,
    }

    async fn app() -> TestApp {
        let db = test_database().await;
        let repos: Arc<dyn crate::domain::RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt = JwtConfig::new("router-test-secret", 1);
        let config = AppConfig::default();
        let store_dir = std::env::temp_dir().join(format!("flexcars-test-{}", uuid::Uuid::new_v4()));
        let services = AppServices::new(
            repos,
            Arc::new(SimulatedPaymentGateway::new()),
            Arc::new(LocalDocumentStore::new(store_dir)),
            jwt.clone(),
            &config,
        );
        let options = RouterOptions::from_config(&config, jwt.clone());
        TestApp {
            router: create_api_router(services.clone(), db, options),
            services,
            jwt,
        }
    }

    impl TestApp {
        async fn token_for(&self, role: UserRole) -> (String, String) {
            let actor = testing::user(&self.services.repos, role).await;
            let token = create_token(&actor.user_id, "t@test.local", role, &self.jwt).unwrap();
            (actor.user_id, token)
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
            extra: &[(&str, &str)],
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(t) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
            }
            for (name, value) in extra {
                builder = builder.header(*name, *value);
            }
            let req = match body {
                Some(b) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(b.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = app().await;
        let (status, body) = app.call("GET", "/api/v1/vehicles", None, None, &[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing authentication token");

        let (status, _) = app
            .call("GET", "/api/v1/vehicles", Some("not-a-jwt"), None, &[])
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = app().await;
        let (status, body) = app
            .call(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": "jane@example.com",
                    "password": "s3cret-pass",
                    "firstName": "Jane",
                    "lastName": "Doe"
                })),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["role"], "CUSTOMER");

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "jane@example.com", "password": "s3cret-pass"})),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tokenType"], "Bearer");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = app.call("GET", "/api/v1/auth/me", Some(&token), None, &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "jane@example.com");
        assert_eq!(body["data"]["firstName"], "Jane");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = app().await;
        let (status, body) = app
            .call(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "nobody@example.com", "password": "whatever"})),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn customers_cannot_create_vehicles() {
        let app = app().await;
        let (_, token) = app.token_for(UserRole::Customer).await;
        let (status, _) = app
            .call(
                "POST",
                "/api/v1/vehicles",
                Some(&token),
                Some(json!({
                    "brand": "Renault",
                    "model": "Clio",
                    "year": 2021,
                    "plateNumber": "AA-123-BB",
                    "fuelType": "PETROL",
                    "currentMileage": 1000,
                    "pricePerDay": "39.90"
                })),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn booking_flow_guards_status_changes() {
        let app = app().await;
        let (_, admin) = app.token_for(UserRole::Admin).await;
        let (_, customer) = app.token_for(UserRole::Customer).await;
        let vehicle = testing::vehicle(&app.services.repos).await;
        let (start, end) = testing::window(3, 2);

        let booking = json!({
            "vehicleId": vehicle.id,
            "startDatetime": start,
            "endDatetime": end,
            "pickupLocation": "Paris",
            "dropoffLocation": "Lyon"
        });
        let (status, body) = app
            .call("POST", "/api/v1/reservations", Some(&customer), Some(booking.clone()), &[])
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "PENDING");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        // same window again
        let (status, _) = app
            .call("POST", "/api/v1/reservations", Some(&customer), Some(booking), &[])
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let status_uri = format!("/api/v1/reservations/{}/status", id);
        let (status, _) = app
            .call("PUT", &status_uri, Some(&admin), Some(json!({"status": "COMPLETED"})), &[])
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = app
            .call("PUT", &status_uri, Some(&admin), Some(json!({"status": "CONFIRMED"})), &[])
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "CONFIRMED");

        // customers cannot drive the lifecycle themselves
        let (status, _) = app
            .call("PUT", &status_uri, Some(&customer), Some(json!({"status": "CANCELLED"})), &[])
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn confirm_payment_replays_with_the_same_key() {
        let app = app().await;
        let (customer_id, customer) = app.token_for(UserRole::Customer).await;
        let vehicle = testing::vehicle(&app.services.repos).await;
        let actor = crate::application::Actor::new(customer_id, UserRole::Customer);
        let reservation = testing::reservation(&app.services.repos, &vehicle, &actor, 5, 2).await;

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/invoices",
                Some(&customer),
                Some(json!({"reservationId": reservation.id})),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let invoice_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/payments/create-payment-intent",
                Some(&customer),
                Some(json!({"invoiceId": invoice_id})),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let intent = body["data"]["paymentIntentId"].as_str().unwrap().to_string();
        let confirm = json!({"paymentIntentId": intent});

        let (status, _) = app
            .call(
                "POST",
                "/api/v1/payments/confirm-payment",
                Some(&customer),
                Some(confirm.clone()),
                &[],
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let key = [("idempotency-key", "order-7-attempt-1")];
        let (status, first) = app
            .call(
                "POST",
                "/api/v1/payments/confirm-payment",
                Some(&customer),
                Some(confirm.clone()),
                &key,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["data"]["status"], "SUCCESS");

        let (status, second) = app
            .call(
                "POST",
                "/api/v1/payments/confirm-payment",
                Some(&customer),
                Some(confirm),
                &key,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["data"]["id"], second["data"]["id"]);

        let (_, invoice) = app
            .call("GET", &format!("/api/v1/invoices/{}", invoice_id), Some(&customer), None, &[])
            .await;
        assert_eq!(invoice["data"]["status"], "PAID");
    }

    #[tokio::test]
    async fn dashboard_is_admin_only() {
        let app = app().await;
        let (_, customer) = app.token_for(UserRole::Customer).await;
        let (status, _) = app.call("GET", "/api/v1/dashboard", Some(&customer), None, &[]).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, admin) = app.token_for(UserRole::Admin).await;
        let (status, body) = app.call("GET", "/api/v1/dashboard", Some(&admin), None, &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["openIncidents"]["status"], "ok");
        assert_eq!(body["data"]["reservations"]["status"], "ok");
    }

    #[tokio::test]
    async fn health_and_request_id() {
        let app = app().await;
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_the_resources() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/reservations/{id}/status",
            "/api/v1/payments/confirm-payment",
            "/api/v1/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
