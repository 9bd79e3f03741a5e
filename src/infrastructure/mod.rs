//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod payment;
pub mod storage;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
pub use payment::SimulatedPaymentGateway;
pub use storage::LocalDocumentStore;
