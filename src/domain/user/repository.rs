//! User repository interface

use async_trait::async_trait;

use super::model::{User, UserRole};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn update(&self, user: User) -> DomainResult<()>;

    /// List users, optionally restricted to one role and to active accounts
    async fn list(
        &self,
        role: Option<UserRole>,
        active_only: bool,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>>;

    async fn count(&self) -> DomainResult<u64>;
}
