//! Domain error types.

use common::EntityId;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No entity of the given kind is stored under the identifier.
    #[error("Could not find {entity} {id}")]
    NotFound { entity: &'static str, id: EntityId },
}
