//! # FlexCars
//!
//! Backend for the FlexCars car rental platform: fleet, bookings, billing,
//! car-sitter handovers, customer documents and incidents, served as a
//! JSON REST API. A typed client for the API lives in [`client`].
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, their invariants and repository traits
//! - **application**: Use cases, authorization and outbound ports
//! - **infrastructure**: SQLite via SeaORM, crypto, payment gateway, file store
//! - **interfaces**: REST API with Swagger documentation
//! - **client**: Typed HTTP client and the availability watcher
//! - **server**: Process runtime (startup, background tasks, shutdown)

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
