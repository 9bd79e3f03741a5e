//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Reservation, ReservationStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

/// Listing criteria; every populated field narrows the result
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub vehicle_id: Option<String>,
    pub customer_id: Option<String>,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn save(&self, reservation: Reservation) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;
    async fn update(&self, reservation: Reservation) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &ReservationFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>>;

    /// Blocking reservations of a vehicle whose window overlaps `[start, end)`
    async fn find_blocking_for_vehicle(
        &self,
        vehicle_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// PENDING reservations whose start is at or before `now`
    async fn find_stale_pending(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;

    async fn count_by_status(&self) -> DomainResult<Vec<(ReservationStatus, u64)>>;

    /// Blocking reservations starting after `now`
    async fn count_upcoming(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
