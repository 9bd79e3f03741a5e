//! Application services
//!
//! One service per use-case area. Each holds the repository provider plus
//! whatever ports and settings it needs, and is shared behind an `Arc`.

pub mod car_sitter;
pub mod dashboard;
pub mod document;
pub mod incident;
pub mod invoice;
pub mod lifecycle;
pub mod payment;
pub mod reservation;
pub mod user;
pub mod vehicle;

use std::sync::Arc;

pub use car_sitter::{CarSitterService, NewHandover, ValidateDropoff, ValidatePickup};
pub use dashboard::{Dashboard, DashboardService, WidgetResult};
pub use document::{DocumentChanges, DocumentService, DocumentUpload};
pub use incident::{IncidentService, NewIncident};
pub use invoice::{InvoiceDocument, InvoiceService};
pub use lifecycle::{start_lifecycle_task, sweep_once, SweepReport};
pub use payment::{IntentCreated, OfflinePayment, PaymentService};
pub use reservation::{
    NewReservation, ReservationChanges, ReservationService, ReservationStats,
};
pub use user::{LoginResult, RegisterUser, UserChanges, UserService};
pub use vehicle::{NewVehicle, PenaltyRequest, VehicleChanges, VehicleService};

use super::ports::{DocumentStore, PaymentGateway};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;

/// All services wired over one repository provider
#[derive(Clone)]
pub struct AppServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub users: Arc<UserService>,
    pub vehicles: Arc<VehicleService>,
    pub reservations: Arc<ReservationService>,
    pub invoices: Arc<InvoiceService>,
    pub payments: Arc<PaymentService>,
    pub car_sitters: Arc<CarSitterService>,
    pub documents: Arc<DocumentService>,
    pub incidents: Arc<IncidentService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn DocumentStore>,
        jwt: JwtConfig,
        config: &AppConfig,
    ) -> Self {
        let billing = config.billing.clone();
        Self {
            users: Arc::new(UserService::new(repos.clone(), jwt)),
            vehicles: Arc::new(VehicleService::new(repos.clone(), billing.penalty_policy())),
            reservations: Arc::new(ReservationService::new(
                repos.clone(),
                billing.car_sitting_fee_cents,
            )),
            invoices: Arc::new(InvoiceService::new(repos.clone(), billing.clone())),
            payments: Arc::new(PaymentService::new(
                repos.clone(),
                gateway,
                billing.currency.clone(),
            )),
            car_sitters: Arc::new(CarSitterService::new(
                repos.clone(),
                billing.penalty_policy(),
            )),
            documents: Arc::new(DocumentService::new(
                repos.clone(),
                store,
                config.uploads.max_file_size_bytes(),
            )),
            incidents: Arc::new(IncidentService::new(repos.clone())),
            dashboard: Arc::new(DashboardService::new(repos.clone())),
            repos,
        }
    }
}

/// Seeding helpers shared by the service tests
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};

    use crate::application::Actor;
    use crate::domain::reservation::Reservation;
    use crate::domain::user::{User, UserRole};
    use crate::domain::vehicle::{FuelType, Vehicle};
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::test_database;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    pub async fn repos() -> Arc<dyn RepositoryProvider> {
        Arc::new(SeaOrmRepositoryProvider::new(test_database().await))
    }

    pub async fn user(repos: &Arc<dyn RepositoryProvider>, role: UserRole) -> Actor {
        let id = uuid::Uuid::new_v4();
        let user = User::new(format!("{}@test.local", id), "hash", "Test", "User", role);
        let actor = Actor::new(user.id.clone(), role);
        repos.users().save(user).await.unwrap();
        actor
    }

    pub async fn vehicle(repos: &Arc<dyn RepositoryProvider>) -> Vehicle {
        let plate = format!("AB-{}", &uuid::Uuid::new_v4().to_string()[..6]);
        let vehicle = Vehicle::new("Peugeot", "208", 2022, plate, FuelType::Petrol, 10_000, None, 4500);
        repos.vehicles().save(vehicle.clone()).await.unwrap();
        vehicle
    }

    /// Window starting `from_days` days from now and lasting `days` days
    pub fn window(from_days: i64, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now() + Duration::days(from_days);
        (start, start + Duration::days(days))
    }

    pub async fn reservation(
        repos: &Arc<dyn RepositoryProvider>,
        vehicle: &Vehicle,
        customer: &Actor,
        from_days: i64,
        days: i64,
    ) -> Reservation {
        let (start, end) = window(from_days, days);
        let r = Reservation::new(
            &vehicle.id,
            &customer.user_id,
            start,
            end,
            "Paris",
            "Paris",
            false,
            Some(vehicle.price_per_day * days),
        );
        repos.reservations().save(r.clone()).await.unwrap();
        r
    }
}
