//! Startup seeding with fixed sample rows.

use std::fmt::Display;

use domain::{Employee, Entity, Order, Status};
use entity_store::{EntityStore, EntityStoreExt, StoreError};

/// Preloads two employees and two orders.
///
/// A store that already holds rows is left untouched, so restarting against
/// a persistent database does not duplicate the samples.
pub async fn load_database(
    employees: &dyn EntityStore<Employee>,
    orders: &dyn EntityStore<Order>,
) -> Result<(), StoreError> {
    preload(
        employees,
        [
            Employee::new("Bilbo", "Baggins", "burglar"),
            Employee::new("Frodo", "Baggins", "thief"),
        ],
    )
    .await?;

    preload(
        orders,
        [
            Order::new("MacBook Pro", Status::Completed),
            Order::new("iPhone", Status::InProgress),
        ],
    )
    .await
}

async fn preload<E: Entity + Display>(
    store: &dyn EntityStore<E>,
    rows: impl IntoIterator<Item = E>,
) -> Result<(), StoreError> {
    if !store.is_empty().await? {
        tracing::info!(resource = E::COLLECTION, "store already populated, skipping preload");
        return Ok(());
    }

    for row in rows {
        store.insert(row).await?;
    }

    for row in store.find_all().await? {
        tracing::info!("Preloaded {row}");
    }
    Ok(())
}
