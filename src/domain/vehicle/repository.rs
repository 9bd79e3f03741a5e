//! Vehicle repository interface

use async_trait::async_trait;

use super::filter::VehicleFilter;
use super::model::{Vehicle, VehicleStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>>;
    async fn find_by_plate(&self, plate_number: &str) -> DomainResult<Option<Vehicle>>;
    async fn update(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &VehicleFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Vehicle>>;

    /// Number of vehicles per fleet status (statuses with no vehicle are omitted)
    async fn count_by_status(&self) -> DomainResult<Vec<(VehicleStatus, u64)>>;
}
