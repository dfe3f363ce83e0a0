//! Data access for heroes
//!
//! - [`HeroQuery`] / [`HeroFilter`]: plans the count and page statements of a listing
//! - [`HeroRepository`]: storage operations, one unit of work each
//! - [`SqliteHeroRepository`]: the sqlx implementation
//! - [`RepositoryError`]: structured errors with operation context
//!
//! # Example
//!
//! ```rust,ignore
//! use hero_service::models::ListRequest;
//! use hero_service::repository::{HeroQuery, HeroRepository, SqliteHeroRepository};
//!
//! let repo = SqliteHeroRepository::new(pool);
//! let query = HeroQuery::from_request(&ListRequest::default().with_search("bat"));
//! let total = repo.count(&query.filter).await?;
//! let heroes = repo.find_page(&query).await?;
//! ```

mod error;
mod pagination;
mod query;
mod sqlite;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::Pagination;
pub use query::{count_builder, HeroFilter, HeroQuery};
pub use sqlite::SqliteHeroRepository;
pub use traits::{HeroRepository, RepositoryResult};
