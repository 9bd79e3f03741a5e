//! Shared HTTP building blocks: response envelope, pagination, error mapping

mod error;
mod validated_json;

pub use error::{ApiError, ApiResult};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::{PaginatedResult, PaginationParams};

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations that return nothing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// One page of a list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Convert a repository page, mapping each item to its DTO
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_limit() -> u32 {
    20
}

/// `page` / `limit` query parameters, clamped to the allowed range
pub fn page_params(page: u32, limit: u32) -> PaginationParams {
    PaginationParams::new(page, limit)
}

/// Parse an optional enum-valued query parameter
pub fn parse_opt<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = crate::domain::DomainError>,
{
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationStatus;

    #[test]
    fn error_envelope_omits_nothing_but_error_on_success() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 1}));
        let err = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );
    }

    #[test]
    fn paginated_response_maps_items() {
        let page = PaginatedResult::new(vec![1, 2], 5, 1, 2);
        let resp = PaginatedResponse::from_result(page, |n| n * 10);
        assert_eq!(resp.items, vec![10, 20]);
        assert_eq!(resp.total_pages, 3);
    }

    #[test]
    fn optional_enum_params() {
        let status: Option<ReservationStatus> = parse_opt(Some("confirmed")).unwrap();
        assert_eq!(status, Some(ReservationStatus::Confirmed));
        assert_eq!(parse_opt::<ReservationStatus>(Some(" ")).unwrap(), None);
        assert!(parse_opt::<ReservationStatus>(Some("nope")).is_err());
    }
}
