//! Uploaded documents on the local filesystem
//!
//! Files are written under the configured upload directory with a generated
//! `<uuid>.<ext>` name; the original file name never reaches the filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::DocumentStore;
use crate::domain::{DomainError, DomainResult};
use crate::shared::InfraError;

pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> DomainResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(DomainError::Validation(format!(
                "invalid stored file name: {}",
                name
            )));
        }
        Ok(self.root.join(name))
    }
}

/// Lower-case alphanumeric extension of at most 8 characters, if any
fn clean_extension(ext: Option<&str>) -> Option<String> {
    let ext = ext?.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn put(&self, extension: Option<&str>, bytes: &[u8]) -> DomainResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(InfraError::Io)?;

        let id = uuid::Uuid::new_v4();
        let name = match clean_extension(extension) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        };
        let path = self.path_for(&name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(InfraError::Io)?;
        debug!(file = %name, size = bytes.len(), "Document stored");
        Ok(name)
    }

    async fn read(&self, name: &str) -> DomainResult<Vec<u8>> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DomainError::NotFound {
                entity: "DocumentFile",
                field: "name",
                value: name.to_string(),
            }),
            Err(e) => Err(InfraError::Io(e).into()),
        }
    }

    async fn delete(&self, name: &str) -> DomainResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %name, "Stored document already missing");
                Ok(())
            }
            Err(e) => Err(InfraError::Io(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalDocumentStore {
        LocalDocumentStore::new(
            std::env::temp_dir().join(format!("flexcars-uploads-{}", uuid::Uuid::new_v4())),
        )
    }

    #[tokio::test]
    async fn put_read_delete() {
        let store = temp_store();
        let name = store.put(Some("PDF"), b"%PDF-1.4").await.unwrap();
        assert!(name.ends_with(".pdf"));
        assert_eq!(store.read(&name).await.unwrap(), b"%PDF-1.4");

        store.delete(&name).await.unwrap();
        assert!(matches!(
            store.read(&name).await,
            Err(DomainError::NotFound { .. })
        ));
        // second delete is a no-op
        store.delete(&name).await.unwrap();
        std::fs::remove_dir_all(store.root()).ok();
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let store = temp_store();
        assert!(matches!(
            store.read("../etc/passwd").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.read(".hidden").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(clean_extension(Some(".JPG")).as_deref(), Some("jpg"));
        assert_eq!(clean_extension(Some("p/d")), None);
        assert_eq!(clean_extension(None), None);
    }
}
