pub mod auth;
pub mod car_sitters;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod incidents;
pub mod invoices;
pub mod metrics;
pub mod payments;
pub mod request_id;
pub mod reservations;
pub mod users;
pub mod vehicles;
