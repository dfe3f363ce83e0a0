//! Query parameters for the hero listing
//!
//! [`ListQuery`] is the raw query string as received. [`ListQuery::into_request`]
//! applies defaults and rejects out-of-range values, producing the
//! [`ListRequest`] consumed by the list pipeline. Values are never clamped.
//!
//! # Example
//!
//! ```rust
//! use hero_service::handlers::ListQuery;
//! use hero_service::models::SortDirection;
//!
//! let request = ListQuery::default()
//!     .with_search("wing")
//!     .with_direction("desc")
//!     .with_page(2)
//!     .into_request()
//!     .unwrap();
//!
//! assert_eq!(request.direction, SortDirection::Desc);
//! assert_eq!(request.limit, 10);
//! assert_eq!(request.page, 2);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiOperation};
use crate::models::{ListRequest, SortDirection};

/// Default number of heroes per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum allowed heroes per page
pub const MAX_LIMIT: u32 = 100;

/// Query string of `GET /heroes`
///
/// Numeric fields are signed so that `page=0` or `limit=-5` reach validation
/// and produce a descriptive message instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Field to sort by; unknown names sort by `id`
    #[serde(alias = "order_by", alias = "sort", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// `asc` or `desc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ListQuery {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply defaults and validate
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error when `page` is outside `1..=u32::MAX`,
    /// `limit` is outside `1..=100` or `direction` is anything but `asc`/`desc`.
    pub fn into_request(self) -> Result<ListRequest, ApiError> {
        let page = match self.page {
            None => 1,
            Some(page) if page < 1 => {
                return Err(invalid(format!("'page' must be at least 1, got {}", page)));
            }
            Some(page) => u32::try_from(page).map_err(|_| {
                invalid(format!("'page' must be at most {}, got {}", u32::MAX, page))
            })?,
        };

        let limit = match self.limit {
            None => DEFAULT_LIMIT,
            Some(limit) => u32::try_from(limit)
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or_else(|| {
                    invalid(format!(
                        "'limit' must be between 1 and {}, got {}",
                        MAX_LIMIT, limit
                    ))
                })?,
        };

        let direction = match self.direction.as_deref() {
            None => SortDirection::Asc,
            Some(direction) => direction.parse::<SortDirection>().map_err(invalid)?,
        };

        let mut request = ListRequest::default()
            .with_direction(direction)
            .with_page(page)
            .with_limit(limit);
        if let Some(search) = self.search {
            request = request.with_search(search);
        }
        if let Some(order_by) = self.order_by.filter(|name| !name.is_empty()) {
            request = request.with_order_by(order_by);
        }
        Ok(request)
    }
}

fn invalid(message: String) -> ApiError {
    ApiError::invalid_input(ApiOperation::List, message)
}
