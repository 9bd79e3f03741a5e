//! Car-sitters module: pickup/dropoff requests and their validation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
