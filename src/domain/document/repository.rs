//! Document repository interface

use async_trait::async_trait;

use super::model::Document;
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: Document) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Document>>;
    async fn update(&self, document: Document) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// List documents, all users when `user_id` is `None`
    async fn list(
        &self,
        user_id: Option<&str>,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Document>>;
}
