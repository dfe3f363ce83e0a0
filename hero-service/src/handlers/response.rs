//! The list response envelope
//!
//! Every listing answers with the same four parts: the page of `data`,
//! `pagination` metadata, the `sort` that was requested and the `filter`
//! that was applied.
//!
//! # Example
//!
//! ```rust
//! use hero_service::handlers::PaginationMeta;
//!
//! let meta = PaginationMeta::new(3, 10, 25);
//! assert_eq!(meta.total_pages, 3);
//! assert!(!meta.has_more);
//! assert_eq!(meta.previous_page, Some(2));
//! assert_eq!(meta.next_page, None);
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::SortDirection;

/// Pagination metadata for list responses
///
/// `previous_page` is not clamped to the last page: asking for page 9 of a
/// two-page listing reports `previousPage: 8`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// The requested page (1-indexed)
    pub current_page: u32,
    /// `ceil(total_items / limit)`, zero for an empty result
    pub total_pages: u32,
    /// Matching heroes across all pages
    pub total_items: u64,
    pub limit: u32,
    /// `current_page < total_pages`
    pub has_more: bool,
    pub previous_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl PaginationMeta {
    /// Derive page metadata from the request and the filtered count
    #[must_use]
    pub fn new(current_page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = calculate_total_pages(total_items, limit);
        let has_more = current_page < total_pages;

        Self {
            current_page,
            total_pages,
            total_items,
            limit,
            has_more,
            previous_page: (current_page > 1).then(|| current_page - 1),
            next_page: has_more.then(|| current_page + 1),
        }
    }
}

/// Ceiling division that tolerates a zero limit
fn calculate_total_pages(total_items: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Sort as requested by the client
///
/// `field` echoes the requested name even when it fell back to `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortEcho {
    pub field: String,
    pub direction: SortDirection,
}

/// Filter actually applied; `search` is `null` when nothing was filtered
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterEcho {
    pub search: Option<String>,
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
    pub sort: SortEcho,
    pub filter: FilterEcho,
}

impl<T> ListResponse<T> {
    pub fn new(
        data: Vec<T>,
        pagination: PaginationMeta,
        sort: SortEcho,
        filter: FilterEcho,
    ) -> Self {
        Self {
            data,
            pagination,
            sort,
            filter,
        }
    }

    /// Number of items on this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
