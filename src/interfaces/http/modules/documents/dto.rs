//! Document DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Document;
use crate::interfaces::http::common::{default_limit, default_page};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: String,
    pub user_id: String,
    /// ID_CARD, DRIVER_LICENSE or PROOF_OF_ADDRESS
    #[serde(rename = "type")]
    pub doc_type: String,
    pub file_url: String,
    /// Where an uploaded file can be fetched; absent for external URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    /// SHA-256 of the uploaded bytes, hex
    pub checksum: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentDto {
    fn from(d: Document) -> Self {
        let download_url = d
            .is_stored_locally()
            .then(|| format!("/api/v1/documents/{}/file", d.id));
        Self {
            id: d.id,
            user_id: d.user_id,
            doc_type: d.doc_type.as_str().to_string(),
            file_url: d.file_url,
            download_url,
            original_name: d.original_name,
            content_type: d.content_type,
            size_bytes: d.size_bytes,
            checksum: d.checksum,
            verified: d.verified,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Register a document hosted elsewhere
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[validate(url(message = "fileUrl must be a URL"))]
    pub file_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    #[validate(url(message = "fileUrl must be a URL"))]
    pub file_url: Option<String>,
    /// Admin only
    pub verified: Option<bool>,
}

/// Multipart form of `POST /documents/upload`
#[derive(Debug, ToSchema)]
pub struct UploadDocumentForm {
    /// ID_CARD, DRIVER_LICENSE or PROOF_OF_ADDRESS
    #[schema(rename = "type")]
    pub doc_type: String,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListDocumentsParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}
