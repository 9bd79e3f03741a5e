//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `middleware`: bearer JWT authentication
//! - `rate_limit`: login throttle
//! - `modules`: one module per resource (DTOs + handlers)
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod rate_limit;
pub mod router;

pub use router::{create_api_router, ApiDoc, RouterOptions};
