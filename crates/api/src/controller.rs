//! CRUD operations over one entity type, returning linked envelopes.

use std::sync::Arc;

use common::EntityId;
use domain::Entity;
use entity_store::EntityStore;

use crate::error::ApiError;
use crate::hypermedia::{CollectionModel, EntityModel, ResourceAssembler};

/// Orchestrates the entity store and the assembler for one resource.
///
/// Holds no per-request state; concurrent replaces of the same identifier
/// are last-writer-wins.
pub struct ResourceController<E> {
    store: Arc<dyn EntityStore<E>>,
    assembler: ResourceAssembler<E>,
}

impl<E: Entity> ResourceController<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>, assembler: ResourceAssembler<E>) -> Self {
        Self { store, assembler }
    }

    /// Lists every stored entity.
    #[tracing::instrument(skip(self), fields(resource = E::COLLECTION))]
    pub async fn list(&self) -> Result<CollectionModel<E>, ApiError> {
        record_request::<E>("list");
        let entities = self.store.find_all().await?;
        Ok(self.assembler.to_collection(entities))
    }

    /// Stores a new entity under a store-assigned identifier.
    #[tracing::instrument(skip(self), fields(resource = E::COLLECTION))]
    pub async fn create(&self, mut payload: E) -> Result<EntityModel<E>, ApiError> {
        record_request::<E>("create");
        payload.set_id(None);
        let created = self.store.insert(payload).await?;
        tracing::info!(id = ?created.id(), "created");
        Ok(self.assembler.to_model(created))
    }

    /// Fetches one entity, failing with `NotFound` when absent.
    #[tracing::instrument(skip(self), fields(resource = E::COLLECTION))]
    pub async fn get(&self, id: EntityId) -> Result<EntityModel<E>, ApiError> {
        record_request::<E>("get");
        let entity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| E::not_found(id))?;
        Ok(self.assembler.to_model(entity))
    }

    /// Overwrites the entity stored under `id`, creating it when absent.
    ///
    /// The identifier always comes from `id`, never from the payload.
    #[tracing::instrument(skip(self), fields(resource = E::COLLECTION))]
    pub async fn replace(&self, id: EntityId, payload: E) -> Result<EntityModel<E>, ApiError> {
        record_request::<E>("replace");
        let entity = match self.store.find_by_id(id).await? {
            Some(mut existing) => {
                existing.replace_fields(payload);
                existing
            }
            None => {
                tracing::debug!(%id, "no entity to replace, creating");
                payload.with_id(id)
            }
        };

        let saved = self.store.save(entity).await?;
        Ok(self.assembler.to_model(saved))
    }

    /// Deletes the entity stored under `id`. An absent identifier is accepted.
    #[tracing::instrument(skip(self), fields(resource = E::COLLECTION))]
    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        record_request::<E>("delete");
        if !self.store.delete_by_id(id).await? {
            tracing::debug!(%id, "nothing to delete");
        }
        Ok(())
    }
}

fn record_request<E: Entity>(operation: &'static str) {
    metrics::counter!(
        "resource_requests_total",
        "resource" => E::COLLECTION,
        "operation" => operation
    )
    .increment(1);
}
