//! SeaORM implementation of DocumentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, parse_column};
use crate::domain::document::{Document, DocumentRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::document;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmDocumentRepository {
    db: DatabaseConnection,
}

impl SeaOrmDocumentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: document::Model) -> DomainResult<Document> {
    Ok(Document {
        doc_type: parse_column("documents.doc_type", &m.doc_type)?,
        id: m.id,
        user_id: m.user_id,
        file_url: m.file_url,
        original_name: m.original_name,
        content_type: m.content_type,
        size_bytes: m.size_bytes,
        checksum: m.checksum,
        verified: m.verified,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(d: Document) -> document::ActiveModel {
    document::ActiveModel {
        id: Set(d.id),
        user_id: Set(d.user_id),
        doc_type: Set(d.doc_type.as_str().to_string()),
        file_url: Set(d.file_url),
        original_name: Set(d.original_name),
        content_type: Set(d.content_type),
        size_bytes: Set(d.size_bytes),
        checksum: Set(d.checksum),
        verified: Set(d.verified),
        created_at: Set(d.created_at),
        updated_at: Set(d.updated_at),
    }
}

#[async_trait]
impl DocumentRepository for SeaOrmDocumentRepository {
    async fn save(&self, d: Document) -> DomainResult<()> {
        debug!("Saving {} document for user {}", d.doc_type, d.user_id);
        domain_to_active(d).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Document>> {
        document::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, d: Document) -> DomainResult<()> {
        let exists = document::Entity::find_by_id(d.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Document", d.id));
        }

        domain_to_active(d).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = document::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Document", id));
        }
        Ok(())
    }

    async fn list(
        &self,
        user_id: Option<&str>,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<Document>> {
        let mut query = document::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(document::Column::UserId.eq(user_id));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(document::Column::CreatedAt)
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
}
