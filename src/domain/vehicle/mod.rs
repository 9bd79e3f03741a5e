//! Vehicle aggregate
//!
//! Contains the Vehicle entity, the fleet listing filter, and repository
//! interface.

pub mod filter;
pub mod model;
pub mod repository;

pub use filter::VehicleFilter;
pub use model::{FuelType, Vehicle, VehicleStatus};
pub use repository::VehicleRepository;
