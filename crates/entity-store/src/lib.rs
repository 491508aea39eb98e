pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::EntityId;
pub use error::{Result, StoreError};
pub use memory::InMemoryEntityStore;
pub use postgres::{PgEntity, PgPool, PostgresEntityStore, connect_pool, run_migrations};
pub use store::{EntityStore, EntityStoreExt};
