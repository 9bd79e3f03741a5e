//! Vehicles module: fleet CRUD, filtered listing, return penalty quote

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
