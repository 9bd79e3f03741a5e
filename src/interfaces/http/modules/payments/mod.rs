//! Payments module: card intents, idempotent confirmation, offline
//! settlements and refunds

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
