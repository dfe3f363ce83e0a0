//! # hero-service
//!
//! REST service for a catalogue of heroes. Its core is the listing endpoint:
//! one `GET /heroes` request filters by a search term, sorts by an
//! allow-listed field, windows the result with offset pagination and answers
//! with a single envelope of data plus pagination, sort and filter metadata.
//!
//! ## Layers
//!
//! - [`handlers`]: boundary validation, the list pipeline, response envelope, API errors
//! - [`repository`]: query planning and SQLite access through sqlx
//! - [`models`]: heroes, update payloads, list requests
//! - [`routes`] / [`server`]: axum routes and the tower-http middleware stack
//!
//! ## Example
//!
//! ```rust,no_run
//! use hero_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let pool = create_pool(&config.database).await?;
//!     ensure_schema(&pool).await?;
//!
//!     Server::new(AppState::new(config, pool)).serve().await
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;

/// Common imports for the binary and for embedding the service
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::{create_pool, ensure_schema};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, CollectionHandler, HeroHandler, ListQuery, ListResponse, PaginationMeta,
    };
    pub use crate::models::{Hero, HeroChanges, HeroStory, ListRequest, NewHero, SortDirection};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{HeroRepository, SqliteHeroRepository};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
