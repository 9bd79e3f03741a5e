//! Application layer
//!
//! Use cases orchestrating the domain aggregates through the repository
//! provider and the outbound ports.

pub mod actor;
pub mod ports;
pub mod services;

pub use actor::Actor;
pub use ports::{DocumentStore, GatewayError, GatewayOutcome, PaymentGateway, PaymentIntent};
pub use services::{
    start_lifecycle_task, AppServices, Dashboard, DocumentChanges, DocumentUpload, IntentCreated,
    InvoiceDocument, LoginResult, NewHandover, NewIncident, NewReservation, NewVehicle,
    OfflinePayment, PenaltyRequest, RegisterUser, ReservationChanges, ReservationStats,
    UserChanges, ValidateDropoff, ValidatePickup, VehicleChanges, WidgetResult,
};
