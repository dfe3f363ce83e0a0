//! Repository trait definitions
//!
//! Uses RPITIT (return position `impl Trait` in traits) so implementations
//! can be written as plain `async fn` without `async_trait`.

use std::future::Future;

use super::{HeroFilter, HeroQuery, RepositoryError};
use crate::models::{Hero, HeroChanges, NewHero};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage operations for heroes
///
/// Each method is one unit of work. Mutations either commit completely or
/// leave the store untouched.
pub trait HeroRepository: Send + Sync {
    /// Number of heroes matching `filter`, ignoring any pagination
    fn count(&self, filter: &HeroFilter) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// One page of heroes in the planned order
    fn find_page(&self, query: &HeroQuery)
        -> impl Future<Output = RepositoryResult<Vec<Hero>>> + Send;

    /// Look up a hero by ID
    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<Hero>>> + Send;

    /// Insert a hero
    ///
    /// Fails with `AlreadyExists` when the alias is taken.
    fn create(&self, data: NewHero) -> impl Future<Output = RepositoryResult<Hero>> + Send;

    /// Apply a partial update
    ///
    /// Fails with `NotFound` for an unknown ID, `InvalidInput` when `changes`
    /// is empty or malformed and `AlreadyExists` when the new alias is taken.
    /// The ID is checked first.
    fn update(
        &self,
        id: i64,
        changes: HeroChanges,
    ) -> impl Future<Output = RepositoryResult<Hero>> + Send;

    /// Delete a hero, returning whether a row was removed
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
