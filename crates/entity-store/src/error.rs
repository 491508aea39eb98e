use thiserror::Error;

/// Errors that can occur when interacting with the entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No identifier is left to assign.
    #[error("Identifier space exhausted for {entity}")]
    IdsExhausted { entity: &'static str },

    /// A stored row could not be mapped back to an entity.
    #[error("Invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
