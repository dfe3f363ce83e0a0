//! Query planning for hero listings
//!
//! A [`HeroQuery`] turns a validated [`ListRequest`] into two independent
//! statements: a filtered `COUNT(*)` and a filtered, ordered, windowed page
//! fetch. Both share the same search predicate. Column names only ever come
//! from the [`HeroField`] allow-list; user text is always bound.

use sqlx::{QueryBuilder, Sqlite};

use super::Pagination;
use crate::models::{HeroField, ListRequest, SortDirection};

const SELECT_HEROES: &str = "SELECT id, name, alias, powers FROM heros";
const COUNT_HEROES: &str = "SELECT COUNT(*) FROM heros";
const SEARCH_COLUMNS: [HeroField; 3] = [HeroField::Name, HeroField::Alias, HeroField::Powers];

/// Row filter shared by the count and the page fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroFilter {
    search: Option<String>,
}

impl HeroFilter {
    /// Case-insensitive substring match over name, alias and powers
    ///
    /// An empty term filters nothing.
    pub fn search(term: impl Into<String>) -> Self {
        let term = term.into();
        Self {
            search: (!term.is_empty()).then_some(term),
        }
    }

    pub fn term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
        let Some(term) = &self.search else {
            return;
        };
        let pattern = like_pattern(term);

        builder.push(" WHERE (");
        for (i, field) in SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(field.column())
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        builder.push(")");
    }
}

/// Wrap `term` in `%` after escaping LIKE metacharacters
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Read plan for one list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroQuery {
    pub filter: HeroFilter,
    pub sort: HeroField,
    pub direction: SortDirection,
    pub pagination: Pagination,
}

impl HeroQuery {
    /// Plan a request; unknown sort fields fall back to `id`
    pub fn from_request(request: &ListRequest) -> Self {
        Self {
            filter: request
                .search
                .as_deref()
                .map(HeroFilter::search)
                .unwrap_or_default(),
            sort: request.sort_field(),
            direction: request.direction,
            pagination: Pagination::from(request),
        }
    }

    /// `SELECT COUNT(*)` over the filtered rows, ignoring order and window
    pub fn count_builder(&self) -> QueryBuilder<'static, Sqlite> {
        count_builder(&self.filter)
    }

    /// Filtered, ordered, windowed row fetch
    pub fn page_builder(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(SELECT_HEROES);
        self.filter.push_where(&mut builder);

        builder
            .push(" ORDER BY ")
            .push(self.sort.column())
            .push(" ")
            .push(self.direction.as_sql());
        if self.sort != HeroField::Id {
            // Stable order among equal sort keys
            builder.push(", id ASC");
        }

        let (limit, offset) = self.pagination.bind_values();
        builder
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        builder
    }
}

/// Count statement for an arbitrary filter
pub fn count_builder(filter: &HeroFilter) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(COUNT_HEROES);
    filter.push_where(&mut builder);
    builder
}
