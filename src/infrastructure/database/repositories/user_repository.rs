//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> DomainResult<User> {
    Ok(User {
        role: parse_column("users.role", &m.role)?,
        id: m.id,
        email: m.email,
        password_hash: m.password_hash,
        first_name: m.first_name,
        last_name: m.last_name,
        phone: m.phone,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        last_login_at: m.last_login_at,
    })
}

fn domain_to_active(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        email: Set(u.email),
        password_hash: Set(u.password_hash),
        first_name: Set(u.first_name),
        last_name: Set(u.last_name),
        phone: Set(u.phone),
        role: Set(u.role.as_str().to_string()),
        is_active: Set(u.is_active),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
        last_login_at: Set(u.last_login_at),
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, u: User) -> DomainResult<()> {
        debug!("Saving user: {}", u.email);
        domain_to_active(u).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, u: User) -> DomainResult<()> {
        debug!("Updating user: {}", u.id);

        let exists = user::Entity::find_by_id(u.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("User", u.id));
        }

        domain_to_active(u).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        active_only: bool,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if active_only {
            query = query.filter(user::Column::IsActive.eq(true));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .offset(params.offset())
            .limit(params.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, params.page, params.limit))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn save_find_and_list_by_role() {
        let repo = SeaOrmUserRepository::new(test_database().await);

        repo.save(User::new("c@x.io", "h", "Carla", "Client", UserRole::Customer))
            .await
            .unwrap();
        let mut sitter = User::new("s@x.io", "h", "Sam", "Sitter", UserRole::CarSitter);
        let sitter_id = sitter.id.clone();
        repo.save(sitter.clone()).await.unwrap();

        let found = repo.find_by_email("S@X.IO").await.unwrap().unwrap();
        assert_eq!(found.id, sitter_id);
        assert_eq!(found.role, UserRole::CarSitter);

        let sitters = repo
            .list(Some(UserRole::CarSitter), true, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(sitters.total, 1);

        sitter.deactivate();
        repo.update(sitter).await.unwrap();
        let active = repo
            .list(Some(UserRole::CarSitter), true, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(active.total, 0);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        repo.save(User::new("dup@x.io", "h", "A", "A", UserRole::Customer))
            .await
            .unwrap();
        let err = repo
            .save(User::new("dup@x.io", "h", "B", "B", UserRole::Customer))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
