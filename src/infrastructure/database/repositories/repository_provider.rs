//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::billing::{InvoiceRepository, PaymentRepository};
use crate::domain::document::DocumentRepository;
use crate::domain::handover::HandoverRepository;
use crate::domain::incident::IncidentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;
use crate::domain::vehicle::VehicleRepository;

use super::document_repository::SeaOrmDocumentRepository;
use super::handover_repository::SeaOrmHandoverRepository;
use super::incident_repository::SeaOrmIncidentRepository;
use super::invoice_repository::SeaOrmInvoiceRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;
use super::vehicle_repository::SeaOrmVehicleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let vehicle = repos.vehicles().find_by_id("v-1").await?;
/// let invoice = repos.invoices().find_by_reservation("r-1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    vehicles: SeaOrmVehicleRepository,
    reservations: SeaOrmReservationRepository,
    invoices: SeaOrmInvoiceRepository,
    payments: SeaOrmPaymentRepository,
    handovers: SeaOrmHandoverRepository,
    documents: SeaOrmDocumentRepository,
    incidents: SeaOrmIncidentRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            invoices: SeaOrmInvoiceRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            handovers: SeaOrmHandoverRepository::new(db.clone()),
            documents: SeaOrmDocumentRepository::new(db.clone()),
            incidents: SeaOrmIncidentRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn invoices(&self) -> &dyn InvoiceRepository {
        &self.invoices
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn handovers(&self) -> &dyn HandoverRepository {
        &self.handovers
    }

    fn documents(&self) -> &dyn DocumentRepository {
        &self.documents
    }

    fn incidents(&self) -> &dyn IncidentRepository {
        &self.incidents
    }
}
