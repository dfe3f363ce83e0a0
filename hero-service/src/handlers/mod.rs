//! HTTP-facing hero operations
//!
//! Sits between the axum routes and the repository:
//!
//! - [`ListQuery`] validates the query string into a [`ListRequest`](crate::models::ListRequest)
//! - [`HeroHandler`] runs the list pipeline and the CRUD operations
//! - [`ListResponse`] is the envelope every listing returns
//! - [`ApiError`] maps failures to status codes and JSON bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use hero_service::handlers::{CollectionHandler, HeroHandler, ListQuery};
//! use hero_service::repository::SqliteHeroRepository;
//!
//! let handler = HeroHandler::new(SqliteHeroRepository::new(pool));
//! let request = ListQuery::default().with_search("bat").into_request()?;
//! let response = handler.list(request).await?;
//! println!("{} of {}", response.len(), response.pagination.total_items);
//! ```

mod error;
mod heroes;
mod query;
mod response;
mod traits;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation, INTERNAL_ERROR_MESSAGE};
pub use heroes::HeroHandler;
pub use query::{ListQuery, DEFAULT_LIMIT, MAX_LIMIT};
pub use response::{FilterEcho, ListResponse, PaginationMeta, SortEcho};
pub use traits::CollectionHandler;
