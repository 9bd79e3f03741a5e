//! Database entities module
//!
//! Enumerations are stored as their upper-case wire names in string columns
//! and money as integer cents.

pub mod document;
pub mod handover_request;
pub mod incident;
pub mod invoice;
pub mod payment;
pub mod reservation;
pub mod user;
pub mod vehicle;

pub use document::Entity as Document;
pub use handover_request::Entity as HandoverRequest;
pub use incident::Entity as Incident;
pub use invoice::Entity as Invoice;
pub use payment::Entity as Payment;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
pub use vehicle::Entity as Vehicle;
