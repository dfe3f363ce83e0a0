//! Handler trait for REST collections
//!
//! Uses RPITIT so implementations are plain `async fn`s.

use std::future::Future;

use super::error::ApiError;
use super::response::ListResponse;
use crate::models::ListRequest;

/// Standard REST CRUD handler trait
///
/// # Type Parameters
///
/// - `Id`: identifier of the entity
/// - `Entity`: the entity returned to clients
/// - `CreateDto`: payload for creating an entity
/// - `UpdateDto`: payload for partially updating an entity
pub trait CollectionHandler<Id, Entity, CreateDto, UpdateDto>: Send + Sync {
    /// Search, sort and paginate the collection
    ///
    /// `request` has already been validated at the boundary.
    fn list(
        &self,
        request: ListRequest,
    ) -> impl Future<Output = Result<ListResponse<Entity>, ApiError>> + Send;

    /// Get a single entity
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity doesn't exist.
    fn get(&self, id: Id) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Create an entity
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed payload and `AlreadyExists`
    /// when a unique attribute is taken.
    fn create(&self, dto: CreateDto) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns `NotFound` before checking the payload, then `InvalidInput`
    /// for an empty or malformed payload and `AlreadyExists` on a conflict.
    fn update(
        &self,
        id: Id,
        dto: UpdateDto,
    ) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Permanently delete an entity
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted.
    fn delete(&self, id: Id) -> impl Future<Output = Result<(), ApiError>> + Send;
}
