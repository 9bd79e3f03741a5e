//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_vehicles;
mod m20250101_000003_create_reservations;
mod m20250101_000004_create_invoices;
mod m20250101_000005_create_payments;
mod m20250101_000006_create_handover_requests;
mod m20250101_000007_create_documents;
mod m20250101_000008_create_incidents;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_vehicles::Migration),
            Box::new(m20250101_000003_create_reservations::Migration),
            Box::new(m20250101_000004_create_invoices::Migration),
            Box::new(m20250101_000005_create_payments::Migration),
            Box::new(m20250101_000006_create_handover_requests::Migration),
            Box::new(m20250101_000007_create_documents::Migration),
            Box::new(m20250101_000008_create_incidents::Migration),
        ]
    }
}
