//! Invoice API handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{CreateInvoiceRequest, InvoiceDto, ListInvoicesParams};
use crate::application::{AppServices, InvoiceDocument};
use crate::domain::billing::InvoiceFilter;
use crate::interfaces::http::common::{
    page_params, parse_opt, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice issued", body = ApiResponse<InvoiceDto>),
        (status = 409, description = "Reservation already invoiced or cancelled")
    )
)]
pub async fn create_invoice(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InvoiceDto>>)> {
    let invoice = services
        .invoices
        .create(&user.actor(), &request.reservation_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(InvoiceDto::from(invoice))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(ListInvoicesParams),
    responses(
        (status = 200, description = "Invoices visible to the caller", body = ApiResponse<PaginatedResponse<InvoiceDto>>)
    )
)]
pub async fn list_invoices(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListInvoicesParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<InvoiceDto>>>> {
    let filter = InvoiceFilter {
        status: parse_opt(params.status.as_deref())?,
        customer_id: params.customer_id,
    };
    let page = services
        .invoices
        .list(&user.actor(), filter, page_params(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        InvoiceDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice", body = ApiResponse<InvoiceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_invoice(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<InvoiceDto>>> {
    let invoice = services.invoices.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(InvoiceDto::from(invoice))))
}

fn document_response(doc: InvoiceDocument, disposition: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, doc.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("{}; filename=\"{}\"", disposition, doc.file_name),
            ),
        ],
        doc.body,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/download",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice document as an attachment", content_type = "text/plain"),
        (status = 404, description = "Not found")
    )
)]
pub async fn download_invoice(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let doc = services.invoices.render(&user.actor(), &id).await?;
    Ok(document_response(doc, "attachment"))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/view",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice document for inline display", content_type = "text/plain"),
        (status = 404, description = "Not found")
    )
)]
pub async fn view_invoice(
    State(services): State<AppServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let doc = services.invoices.render(&user.actor(), &id).await?;
    Ok(document_response(doc, "inline"))
}
