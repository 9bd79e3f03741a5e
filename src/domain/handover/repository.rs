//! Handover request repository interface

use async_trait::async_trait;

use super::model::{HandoverKind, HandoverRequest, HandoverStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default)]
pub struct HandoverFilter {
    pub kind: Option<HandoverKind>,
    pub status: Option<HandoverStatus>,
    pub car_sitter_id: Option<String>,
    pub reservation_id: Option<String>,
}

#[async_trait]
pub trait HandoverRepository: Send + Sync {
    async fn save(&self, request: HandoverRequest) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<HandoverRequest>>;
    async fn update(&self, request: HandoverRequest) -> DomainResult<()>;

    /// Store a decision on a request that is still PENDING in storage.
    /// Fails with `Conflict` when another decision got there first.
    async fn decide(&self, request: HandoverRequest) -> DomainResult<()>;

    async fn list(
        &self,
        filter: &HandoverFilter,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<HandoverRequest>>;

    /// The PENDING request of a kind for a reservation, if any
    async fn find_pending(
        &self,
        reservation_id: &str,
        kind: HandoverKind,
    ) -> DomainResult<Option<HandoverRequest>>;

    async fn count_pending(&self) -> DomainResult<u64>;
}
