//! Customer order entity.

mod status;

pub use status::{Status, UnknownStatus};

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A customer order with a description and lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
}

impl Order {
    /// Creates an unsaved order.
    pub fn new(description: impl Into<String>, status: Status) -> Self {
        Self {
            id: None,
            description: description.into(),
            status,
        }
    }
}

impl Entity for Order {
    const KIND: &'static str = "order";
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn replace_fields(&mut self, other: Self) {
        self.description = other.description;
        self.status = other.status;
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map_or_else(|| "null".to_string(), |id| id.to_string());
        write!(
            f,
            "Order{{id={id}, description='{}', status={}}}",
            self.description, self.status
        )
    }
}
