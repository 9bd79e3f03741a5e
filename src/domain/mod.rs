//! Domain layer
//!
//! One module per aggregate: the entity, its invariants and the repository
//! trait the infrastructure layer implements.

#[macro_use]
mod macros;

pub mod billing;
pub mod document;
pub mod handover;
pub mod incident;
pub mod repositories;
pub mod reservation;
pub mod user;
pub mod vehicle;

pub use billing::{
    Invoice, InvoiceRepository, InvoiceStatus, InvoiceTotals, Payment, PaymentMethod,
    PaymentRepository, PaymentStatus,
};
pub use document::{Document, DocumentRepository, DocumentType};
pub use handover::{
    HandoverKind, HandoverRepository, HandoverRequest, HandoverStatus, PenaltyBreakdown,
    PenaltyPolicy,
};
pub use incident::{Incident, IncidentRepository, IncidentSeverity, IncidentStatus};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{Availability, Reservation, ReservationRepository, ReservationStatus};
pub use user::{User, UserRepository, UserRole};
pub use vehicle::{FuelType, Vehicle, VehicleFilter, VehicleRepository, VehicleStatus};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
