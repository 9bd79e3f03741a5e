//! Documents module: identity documents by URL or multipart upload

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
