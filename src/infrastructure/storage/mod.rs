//! Document file storage adapters

pub mod local;

pub use local::LocalDocumentStore;
