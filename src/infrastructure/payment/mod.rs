//! Payment gateway adapters

pub mod simulated;

pub use simulated::SimulatedPaymentGateway;
