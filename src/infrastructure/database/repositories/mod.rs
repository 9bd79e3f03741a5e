//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod document_repository;
pub mod handover_repository;
pub mod incident_repository;
pub mod invoice_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use std::str::FromStr;

use sea_orm::{DbErr, SqlErr};

use crate::domain::{DomainError, DomainResult};

/// Map a database error; constraint violations become conflicts
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Duplicate value: {}", msg))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Referenced record constraint: {}", msg))
        }
        _ => DomainError::Storage(e.to_string()),
    }
}

/// Parse a stored enumeration column
pub(crate) fn parse_column<T>(column: &'static str, value: &str) -> DomainResult<T>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|_| DomainError::Storage(format!("Invalid {} value in database: {}", column, value)))
}

/// Status counts from a `GROUP BY status` query, skipping unknown values
pub(crate) fn status_counts<T>(rows: Vec<(String, i64)>) -> Vec<(T, u64)>
where
    T: FromStr<Err = DomainError>,
{
    rows.into_iter()
        .filter_map(|(status, count)| {
            status
                .parse::<T>()
                .ok()
                .map(|s| (s, count.max(0) as u64))
        })
        .collect()
}
