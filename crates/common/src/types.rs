use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a persisted entity.
///
/// Wraps the numeric primary key so identifiers of stored records are not
/// mixed up with arbitrary integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Creates an entity ID from a raw key.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the identifier following this one, or None at `i64::MAX`.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}
