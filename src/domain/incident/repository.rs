//! Incident repository interface

use async_trait::async_trait;

use super::model::{Incident, IncidentStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub vehicle_id: Option<String>,
}

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn save(&self, incident: Incident) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Incident>>;
    async fn update(&self, incident: Incident) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &IncidentFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Incident>>;

    /// OPEN incidents for a vehicle
    async fn count_open_for_vehicle(&self, vehicle_id: &str) -> DomainResult<u64>;

    async fn count_open(&self) -> DomainResult<u64>;
}
