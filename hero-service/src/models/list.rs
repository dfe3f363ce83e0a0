use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HeroField;

/// Sort direction for list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    /// Only the exact lowercase words are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!(
                "'direction' must be 'asc' or 'desc', got '{}'",
                other
            )),
        }
    }
}

impl SortDirection {
    /// SQL ORDER BY keyword
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One validated list query
///
/// Produced by the HTTP boundary once `page >= 1`, `1 <= limit <= 100`
/// and the direction have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Search term; `None` means no filtering
    pub search: Option<String>,
    /// Sort field as requested, possibly not a hero attribute
    pub order_by: String,
    pub direction: SortDirection,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            search: None,
            order_by: HeroField::Id.column().to_string(),
            direction: SortDirection::Asc,
            page: 1,
            limit: 10,
        }
    }
}

impl ListRequest {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// The column actually sorted on
    pub fn sort_field(&self) -> HeroField {
        HeroField::resolve(&self.order_by)
    }

    /// Rows to skip: `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}
