//! The trait implemented by every resource the service stores and exposes.

use std::fmt::Debug;

use common::EntityId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DomainError;

/// A stored record with a store-assigned identifier.
///
/// The identifier is `None` until the record has been persisted. Once
/// assigned it is never reassigned: `replace_fields` overwrites every
/// mutable field and leaves the identifier alone.
pub trait Entity: Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Singular name used in error messages, e.g. `employee`.
    const KIND: &'static str;

    /// Collection name used as link relation and path segment, e.g. `employees`.
    const COLLECTION: &'static str;

    /// Returns the identifier, if the entity has been persisted.
    fn id(&self) -> Option<EntityId>;

    /// Sets or clears the identifier.
    fn set_id(&mut self, id: Option<EntityId>);

    /// Overwrites all mutable fields with those of `other`.
    fn replace_fields(&mut self, other: Self);

    /// Returns the entity with its identifier set to `id`.
    fn with_id(mut self, id: EntityId) -> Self {
        self.set_id(Some(id));
        self
    }

    /// Builds the not-found error for this entity kind.
    fn not_found(id: EntityId) -> DomainError {
        DomainError::NotFound {
            entity: Self::KIND,
            id,
        }
    }
}
