//! Offset pagination window

use crate::models::ListRequest;

/// Offset/limit window for a page fetch
///
/// # Example
///
/// ```rust
/// use hero_service::repository::Pagination;
///
/// let window = Pagination::page(3, 10);
/// assert_eq!(window.offset, 20);
/// assert_eq!(window.limit, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of rows to skip
    pub offset: u64,
    /// Maximum number of rows to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-indexed page number
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        Self {
            offset: page_number.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// SQLite binds integers as `i64`
    pub(crate) fn bind_values(&self) -> (i64, i64) {
        let clamp = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
        (clamp(self.limit), clamp(self.offset))
    }
}

impl From<&ListRequest> for Pagination {
    fn from(request: &ListRequest) -> Self {
        Self::new(request.offset(), u64::from(request.limit))
    }
}
