//! Users module: account management (admin CRUD) and the car-sitter roster

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
