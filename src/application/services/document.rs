//! Customer documents (ID card, driver license, proof of address)
//!
//! A document either points at an external `file_url` or owns an uploaded
//! file held by the [`DocumentStore`]; uploaded files carry a SHA-256
//! checksum and their `file_url` is the stored file name.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::DocumentStore;
use crate::application::Actor;
use crate::domain::document::{Document, DocumentType};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::sha256_hex;
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub doc_type: DocumentType,
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub doc_type: Option<DocumentType>,
    pub file_url: Option<String>,
    pub verified: Option<bool>,
}

pub struct DocumentService {
    repos: Arc<dyn RepositoryProvider>,
    store: Arc<dyn DocumentStore>,
    max_size: u64,
}

impl DocumentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, store: Arc<dyn DocumentStore>, max_size: u64) -> Self {
        Self {
            repos,
            store,
            max_size,
        }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Register a document hosted elsewhere
    pub async fn create(&self, actor: &Actor, doc_type: DocumentType, file_url: &str) -> DomainResult<Document> {
        let file_url = file_url.trim();
        if file_url.is_empty() {
            return Err(DomainError::Validation("file_url is required".into()));
        }
        let document = Document::new(&actor.user_id, doc_type, file_url);
        self.repos.documents().save(document.clone()).await?;
        info!(document_id = %document.id, doc_type = %doc_type, "Document registered");
        Ok(document)
    }

    pub async fn upload(&self, actor: &Actor, upload: DocumentUpload) -> DomainResult<Document> {
        if upload.bytes.is_empty() {
            return Err(DomainError::Validation("uploaded file is empty".into()));
        }
        if upload.bytes.len() as u64 > self.max_size {
            return Err(DomainError::Validation(format!(
                "file exceeds the {} byte limit",
                self.max_size
            )));
        }

        let extension = upload
            .original_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext);
        let stored = self.store.put(extension, &upload.bytes).await?;

        let mut document = Document::new(&actor.user_id, upload.doc_type, &stored);
        document.original_name = upload.original_name;
        document.content_type = upload.content_type;
        document.size_bytes = Some(upload.bytes.len() as i64);
        document.checksum = Some(sha256_hex(&upload.bytes));

        if let Err(e) = self.repos.documents().save(document.clone()).await {
            // do not leave an orphan file behind
            if let Err(cleanup) = self.store.delete(&stored).await {
                warn!(file = %stored, error = %cleanup, "Failed to remove orphan upload");
            }
            return Err(e);
        }

        info!(
            document_id = %document.id,
            doc_type = %document.doc_type,
            size = upload.bytes.len(),
            "📄 Document uploaded"
        );
        Ok(document)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Document> {
        let document = self
            .repos
            .documents()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Document", id))?;
        actor.require_owner_or_admin(&document.user_id, "document")?;
        Ok(document)
    }

    pub async fn list(&self, actor: &Actor, params: PaginationParams) -> DomainResult<PaginatedResult<Document>> {
        let scope = actor.scope();
        self.repos.documents().list(scope.as_deref(), params).await
    }

    /// Stored content of an uploaded document
    pub async fn read_file(&self, actor: &Actor, id: &str) -> DomainResult<(Document, Vec<u8>)> {
        let document = self.get(actor, id).await?;
        if !document.is_stored_locally() {
            return Err(DomainError::NotFound {
                entity: "DocumentFile",
                field: "document_id",
                value: document.id,
            });
        }
        let bytes = self.store.read(&document.file_url).await?;
        Ok((document, bytes))
    }

    /// Owners may change type and URL; only admins flip `verified`.
    pub async fn update(&self, actor: &Actor, id: &str, changes: DocumentChanges) -> DomainResult<Document> {
        let mut document = self.get(actor, id).await?;

        if let Some(verified) = changes.verified {
            actor.require_admin()?;
            document.set_verified(verified);
        }
        if let Some(doc_type) = changes.doc_type {
            document.doc_type = doc_type;
            document.verified = false;
        }
        if let Some(url) = changes.file_url {
            if document.is_stored_locally() {
                return Err(DomainError::Conflict(
                    "Uploaded documents cannot be re-pointed; upload a new file".into(),
                ));
            }
            let url = url.trim().to_string();
            if url.is_empty() {
                return Err(DomainError::Validation("file_url must not be empty".into()));
            }
            document.file_url = url;
            document.verified = false;
        }
        document.updated_at = chrono::Utc::now();

        self.repos.documents().update(document.clone()).await?;
        info!(document_id = %document.id, verified = document.verified, "Document updated");
        Ok(document)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let document = self.get(actor, id).await?;
        self.repos.documents().delete(&document.id).await?;
        if document.is_stored_locally() {
            self.store.delete(&document.file_url).await?;
        }
        info!(document_id = %document.id, "Document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::domain::user::UserRole;
    use crate::infrastructure::LocalDocumentStore;

    async fn setup() -> (Arc<dyn RepositoryProvider>, DocumentService, std::path::PathBuf) {
        let repos = testing::repos().await;
        let dir = std::env::temp_dir().join(format!("flexcars-docs-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(LocalDocumentStore::new(dir.clone()));
        (repos.clone(), DocumentService::new(repos, store, 1024), dir)
    }

    fn upload(bytes: &[u8]) -> DocumentUpload {
        DocumentUpload {
            doc_type: DocumentType::DriverLicense,
            original_name: Some("licence.PDF".into()),
            content_type: Some("application/pdf".into()),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn upload_records_checksum_and_serves_file() {
        let (repos, service, dir) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;

        let doc = service.upload(&customer, upload(b"hello")).await.unwrap();
        assert!(doc.file_url.ends_with(".pdf"));
        assert_eq!(doc.size_bytes, Some(5));
        assert_eq!(doc.checksum.as_deref(), Some(sha256_hex(b"hello").as_str()));

        let (_, bytes) = service.read_file(&customer, &doc.id).await.unwrap();
        assert_eq!(bytes, b"hello");

        service.delete(&customer, &doc.id).await.unwrap();
        assert!(!dir.join(&doc.file_url).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let (repos, service, _dir) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let big = vec![0u8; 2048];
        assert!(matches!(
            service.upload(&customer, upload(&big)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn only_admins_verify() {
        let (repos, service, _dir) = setup().await;
        let customer = testing::user(&repos, UserRole::Customer).await;
        let admin = testing::user(&repos, UserRole::Admin).await;
        let doc = service
            .create(&customer, DocumentType::IdCard, "https://files.example/id.png")
            .await
            .unwrap();

        let verify = DocumentChanges {
            verified: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&customer, &doc.id, verify.clone()).await,
            Err(DomainError::Forbidden(_))
        ));
        let verified = service.update(&admin, &doc.id, verify).await.unwrap();
        assert!(verified.verified);

        // a new file un-verifies the document
        let repointed = service
            .update(
                &customer,
                &doc.id,
                DocumentChanges {
                    file_url: Some("https://files.example/id2.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!repointed.verified);
    }

    #[tokio::test]
    async fn documents_are_private_to_their_owner() {
        let (repos, service, _dir) = setup().await;
        let owner = testing::user(&repos, UserRole::Customer).await;
        let other = testing::user(&repos, UserRole::Customer).await;
        let doc = service
            .create(&owner, DocumentType::ProofOfAddress, "https://files.example/bill.pdf")
            .await
            .unwrap();

        assert!(matches!(
            service.get(&other, &doc.id).await,
            Err(DomainError::Forbidden(_))
        ));
        let listed = service.list(&other, PaginationParams::default()).await.unwrap();
        assert_eq!(listed.total, 0);
        assert!(matches!(
            service.read_file(&owner, &doc.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
