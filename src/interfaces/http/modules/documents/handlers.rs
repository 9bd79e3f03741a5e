//! Document API handlers
//!
//! Identity documents either point at an external URL or are uploaded as
//! multipart and kept in the local document store.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{
    CreateDocumentRequest, DocumentDto, ListDocumentsParams, UpdateDocumentRequest,
    UploadDocumentForm,
};
use crate::application::{AppServices, DocumentChanges, DocumentUpload};
use crate::domain::DocumentType;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiError, ApiResponse, ApiResult, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "Documents",
    security(("bearer_auth" = [])),
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document registered", body = ApiResponse<DocumentDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_document(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DocumentDto>>)> {
    let doc_type: DocumentType = request.doc_type.parse()?;
    let document = services
        .documents
        .create(&user.actor(), doc_type, &request.file_url)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DocumentDto::from(document))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/documents/upload",
    tag = "Documents",
    security(("bearer_auth" = [])),
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = ApiResponse<DocumentDto>),
        (status = 400, description = "Malformed multipart body or missing field"),
        (status = 422, description = "Empty or oversized file, unknown type")
    )
)]
pub async fn upload_document(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<DocumentDto>>)> {
    let mut doc_type: Option<DocumentType> = None;
    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid type field: {}", e)))?;
                doc_type = Some(text.parse()?);
            }
            Some("file") => {
                let name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::new(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        format!("Could not read file: {}", e),
                    )
                })?;
                file = Some((name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let doc_type = doc_type.ok_or_else(|| ApiError::bad_request("Missing form field: type"))?;
    let (original_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::bad_request("Missing form field: file"))?;

    let document = services
        .documents
        .upload(
            &user.actor(),
            DocumentUpload {
                doc_type,
                original_name,
                content_type,
                bytes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DocumentDto::from(document))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(ListDocumentsParams),
    responses(
        (status = 200, description = "Own documents, or all for admins", body = ApiResponse<PaginatedResponse<DocumentDto>>)
    )
)]
pub async fn list_documents(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListDocumentsParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<DocumentDto>>>> {
    let page = services
        .documents
        .list(&user.actor(), page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        DocumentDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = ApiResponse<DocumentDto>),
        (status = 403, description = "Not your document"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_document(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<DocumentDto>>> {
    let document = services.documents.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/file",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Stored file content", content_type = "application/octet-stream"),
        (status = 404, description = "No stored file")
    )
)]
pub async fn get_document_file(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let (document, bytes) = services.documents.read_file(&user.actor(), &id).await?;
    let content_type = document
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let file_name = document
        .original_name
        .unwrap_or_else(|| document.file_url.clone())
        .replace('"', "");
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = ApiResponse<DocumentDto>),
        (status = 403, description = "Only admins may change verification")
    )
)]
pub async fn update_document(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateDocumentRequest>,
) -> ApiResult<Json<ApiResponse<DocumentDto>>> {
    let changes = DocumentChanges {
        doc_type: parse_opt(request.doc_type.as_deref())?,
        file_url: request.file_url,
        verified: request.verified,
    };
    let document = services
        .documents
        .update(&user.actor(), &id, changes)
        .await?;
    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document and stored file removed", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_document(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    services.documents.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
