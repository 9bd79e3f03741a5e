//! Invoices module: issuing, listing and rendering invoices

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
