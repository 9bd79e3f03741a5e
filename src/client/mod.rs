//! Typed HTTP client for the FlexCars API
//!
//! [`FlexCarsClient`] wraps the REST endpoints and unwraps the response
//! envelope. [`availability::AvailabilityWatcher`] runs the debounced
//! availability check that booking forms use.

pub mod api;
pub mod availability;

pub use api::{ClientError, FlexCarsClient};
pub use availability::{
    AvailabilityInput, AvailabilitySource, AvailabilityState, AvailabilityWatcher,
};
