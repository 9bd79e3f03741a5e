//! Document domain entity

use chrono::{DateTime, Utc};

str_enum! {
    pub enum DocumentType {
        IdCard => "ID_CARD",
        DriverLicense => "DRIVER_LICENSE",
        ProofOfAddress => "PROOF_OF_ADDRESS",
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub doc_type: DocumentType,
    /// Storage reference: the stored file name for uploads, or an external URL
    pub file_url: String,
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    /// Hex SHA-256 of the uploaded content
    pub checksum: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        user_id: impl Into<String>,
        doc_type: DocumentType,
        file_url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            doc_type,
            file_url: file_url.into(),
            original_name: None,
            content_type: None,
            size_bytes: None,
            checksum: None,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the content lives in local upload storage
    pub fn is_stored_locally(&self) -> bool {
        self.checksum.is_some()
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.verified = verified;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_unverified() {
        let d = Document::new("u-1", DocumentType::DriverLicense, "https://files/x.pdf");
        assert!(!d.verified);
        assert!(!d.is_stored_locally());
        assert_eq!(d.doc_type.as_str(), "DRIVER_LICENSE");
    }
}
