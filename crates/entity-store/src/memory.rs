use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::Entity;
use tokio::sync::RwLock;

use crate::{
    EntityId, Result, StoreError,
    store::{EntityStore, record_operation},
};

struct Table<E> {
    rows: BTreeMap<EntityId, E>,
    last_id: EntityId,
}

impl<E: Entity> Table<E> {
    fn insert_new(&mut self, mut entity: E) -> Result<E> {
        let id = self
            .last_id
            .next()
            .ok_or(StoreError::IdsExhausted { entity: E::KIND })?;
        self.last_id = id;
        entity.set_id(Some(id));
        self.rows.insert(id, entity.clone());
        Ok(entity)
    }
}

/// In-memory entity store implementation.
///
/// Stores entities in an ordered map and provides the same interface as the
/// PostgreSQL implementation. Clones share the same underlying table.
#[derive(Clone)]
pub struct InMemoryEntityStore<E> {
    table: Arc<RwLock<Table<E>>>,
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: EntityId::new(0),
            })),
        }
    }
}

impl<E: Entity> InMemoryEntityStore<E> {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    pub async fn entity_count(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Removes all entities. Identifiers already handed out are not reused.
    pub async fn clear(&self) {
        self.table.write().await.rows.clear();
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn insert(&self, entity: E) -> Result<E> {
        record_operation(E::KIND, "insert");
        let mut table = self.table.write().await;
        table.insert_new(entity)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<E>> {
        record_operation(E::KIND, "find_by_id");
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        record_operation(E::KIND, "find_all");
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn save(&self, entity: E) -> Result<E> {
        record_operation(E::KIND, "save");
        let mut table = self.table.write().await;

        let Some(id) = entity.id() else {
            return table.insert_new(entity);
        };

        if id > table.last_id {
            table.last_id = id;
        }
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool> {
        record_operation(E::KIND, "delete_by_id");
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        record_operation(E::KIND, "count");
        Ok(self.table.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use domain::{Employee, Order, Status};

    use super::*;
    use crate::store::EntityStoreExt;

    fn bilbo() -> Employee {
        Employee::new("Bilbo", "Baggins", "burglar")
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryEntityStore::new();

        let first = store.insert(bilbo()).await.unwrap();
        let second = store
            .insert(Employee::new("Frodo", "Baggins", "thief"))
            .await
            .unwrap();

        assert_eq!(first.id, Some(EntityId::new(1)));
        assert_eq!(second.id, Some(EntityId::new(2)));
        assert_eq!(store.entity_count().await, 2);
    }

    #[tokio::test]
    async fn insert_discards_provided_id() {
        let store = InMemoryEntityStore::new();

        let stored = store
            .insert(bilbo().with_id(EntityId::new(77)))
            .await
            .unwrap();

        assert_eq!(stored.id, Some(EntityId::new(1)));
        assert!(store.find_by_id(EntityId::new(77)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_stored_entity() {
        let store = InMemoryEntityStore::new();
        let stored = store.insert(bilbo()).await.unwrap();

        let found = store.find_by_id(EntityId::new(1)).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn find_by_id_missing_returns_none() {
        let store: InMemoryEntityStore<Employee> = InMemoryEntityStore::new();
        assert!(store.find_by_id(EntityId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_orders_by_id() {
        let store = InMemoryEntityStore::new();
        store
            .save(Order::new("later", Status::Completed).with_id(EntityId::new(10)))
            .await
            .unwrap();
        store
            .insert(Order::new("next", Status::InProgress))
            .await
            .unwrap();
        store
            .save(Order::new("earlier", Status::Cancelled).with_id(EntityId::new(3)))
            .await
            .unwrap();

        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id.unwrap().as_i64())
            .collect();
        assert_eq!(ids, vec![3, 10, 11]);
    }

    #[tokio::test]
    async fn save_overwrites_existing() {
        let store = InMemoryEntityStore::new();
        let mut stored = store.insert(bilbo()).await.unwrap();
        stored.role = "ring bearer".to_string();

        store.save(stored).await.unwrap();

        let found = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
        assert_eq!(found.role, "ring bearer");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_under_explicit_id_advances_sequence() {
        let store = InMemoryEntityStore::new();
        store
            .save(bilbo().with_id(EntityId::new(5)))
            .await
            .unwrap();

        let next = store.insert(bilbo()).await.unwrap();
        assert_eq!(next.id, Some(EntityId::new(6)));
    }

    #[tokio::test]
    async fn insert_after_save_at_max_id_fails_without_panicking() {
        let store = InMemoryEntityStore::new();
        let max = EntityId::new(i64::MAX);
        store.save(bilbo().with_id(max)).await.unwrap();

        let result = store.insert(bilbo()).await;
        assert!(matches!(
            result,
            Err(StoreError::IdsExhausted { entity: "employee" })
        ));

        // Existing rows stay reachable and updatable.
        assert_eq!(store.entity_count().await, 1);
        let mut stored = store.find_by_id(max).await.unwrap().unwrap();
        stored.role = "ring bearer".to_string();
        assert!(store.save(stored).await.is_ok());
    }

    #[tokio::test]
    async fn insert_just_below_max_id_takes_last_identifier() {
        let store = InMemoryEntityStore::new();
        store
            .save(bilbo().with_id(EntityId::new(i64::MAX - 1)))
            .await
            .unwrap();

        let last = store.insert(bilbo()).await.unwrap();
        assert_eq!(last.id, Some(EntityId::new(i64::MAX)));
        assert!(store.insert(bilbo()).await.is_err());
    }

    #[tokio::test]
    async fn save_without_id_inserts() {
        let store = InMemoryEntityStore::new();
        let saved = store.save(bilbo()).await.unwrap();
        assert_eq!(saved.id, Some(EntityId::new(1)));
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let store = InMemoryEntityStore::new();
        store.insert(bilbo()).await.unwrap();

        assert!(store.delete_by_id(EntityId::new(1)).await.unwrap());
        assert!(!store.delete_by_id(EntityId::new(1)).await.unwrap());
        assert!(store.find_by_id(EntityId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryEntityStore::new();
        store.insert(bilbo()).await.unwrap();
        store.delete_by_id(EntityId::new(1)).await.unwrap();

        let next = store.insert(bilbo()).await.unwrap();
        assert_eq!(next.id, Some(EntityId::new(2)));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryEntityStore::new();
        let clone = store.clone();
        store.insert(bilbo()).await.unwrap();

        assert_eq!(clone.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_empties_store() {
        let store = InMemoryEntityStore::new();
        store.insert(bilbo()).await.unwrap();
        assert!(!store.is_empty().await.unwrap());

        store.clear().await;
        assert!(store.is_empty().await.unwrap());
    }
}
