//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::billing::{InvoiceRepository, PaymentRepository};
use super::document::DocumentRepository;
use super::handover::HandoverRepository;
use super::incident::IncidentRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use super::vehicle::VehicleRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let vehicle = repos.vehicles().find_by_id("v-1").await?;
///     let bookings = repos.reservations().find_blocking_for_vehicle("v-1", start, end).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn invoices(&self) -> &dyn InvoiceRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn handovers(&self) -> &dyn HandoverRepository;
    fn documents(&self) -> &dyn DocumentRepository;
    fn incidents(&self) -> &dyn IncidentRepository;
}
