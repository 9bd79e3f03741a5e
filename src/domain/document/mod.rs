//! Document aggregate
//!
//! Identity and licence documents uploaded by customers.

pub mod model;
pub mod repository;

pub use model::{Document, DocumentType};
pub use repository::DocumentRepository;
