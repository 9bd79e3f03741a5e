//! Reservation aggregate
//!
//! Contains the Reservation entity with its status state machine, the
//! availability rules, pricing, and repository interface.

pub mod availability;
pub mod model;
pub mod pricing;
pub mod repository;

pub use availability::{Availability, AvailabilityQuery};
pub use model::{Reservation, ReservationStatus};
pub use pricing::quote_total;
pub use repository::{ReservationFilter, ReservationRepository};
