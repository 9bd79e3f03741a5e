//! Handover aggregate
//!
//! Pickup and dropoff requests that a car sitter validates or rejects, and
//! the penalty charged on dropoff.

pub mod model;
pub mod penalty;
pub mod repository;

pub use model::{HandoverKind, HandoverRequest, HandoverStatus};
pub use penalty::{PenaltyBreakdown, PenaltyInput, PenaltyPolicy};
pub use repository::{HandoverFilter, HandoverRepository};
