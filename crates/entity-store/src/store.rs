use async_trait::async_trait;
use domain::Entity;

use crate::{EntityId, Result};

/// Core trait for entity store implementations.
///
/// An entity store owns the identity and lifetime of the records of one
/// entity type, keyed by a store-assigned numeric identifier.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Persists a new entity under a freshly assigned identifier.
    ///
    /// Any identifier carried by `entity` is discarded.
    async fn insert(&self, entity: E) -> Result<E>;

    /// Retrieves the entity stored under `id`.
    ///
    /// Returns None if no such entity exists.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<E>>;

    /// Retrieves every stored entity, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<E>>;

    /// Upserts an entity by its identifier.
    ///
    /// An entity without identifier is inserted as by `insert`. An entity
    /// whose identifier is absent from the store is created under that
    /// identifier, and later inserts are guaranteed not to reuse it.
    async fn save(&self, entity: E) -> Result<E>;

    /// Removes the entity stored under `id`.
    ///
    /// Returns whether an entity was removed. Deleting an absent identifier
    /// is not an error.
    async fn delete_by_id(&self, id: EntityId) -> Result<bool>;

    /// Returns the number of stored entities.
    async fn count(&self) -> Result<usize>;
}

/// Extension trait providing convenience methods for entity stores.
#[async_trait]
pub trait EntityStoreExt<E: Entity>: EntityStore<E> {
    /// Checks whether the store holds no entities.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.count().await? == 0)
    }
}

// Blanket implementation for all EntityStore implementations
impl<E: Entity, T: EntityStore<E> + ?Sized> EntityStoreExt<E> for T {}

pub(crate) fn record_operation(entity: &'static str, operation: &'static str) {
    metrics::counter!(
        "entity_store_operations_total",
        "entity" => entity,
        "operation" => operation
    )
    .increment(1);
}
