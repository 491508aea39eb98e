//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p entity-store --test postgres_integration
//! ```

use std::sync::Arc;

use domain::{Employee, Entity, Order, Status};
use entity_store::{
    EntityId, EntityStore, EntityStoreExt, PgPool, PostgresEntityStore, StoreError, connect_pool,
    run_migrations,
};
use serial_test::serial;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = connect_pool(&connection_string, 1).await.unwrap();
            run_migrations(&temp_pool).await.unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables and reset sequences
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = connect_pool(&info.connection_string, 5).await.unwrap();

    sqlx::query("TRUNCATE TABLE employee, customer_order RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

async fn employee_store() -> PostgresEntityStore<Employee> {
    PostgresEntityStore::new(get_test_pool().await)
}

#[tokio::test]
#[serial]
async fn insert_and_find_employee() {
    let store = employee_store().await;

    let stored = store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();
    assert_eq!(stored.id, Some(EntityId::new(1)));

    let found = store.find_by_id(EntityId::new(1)).await.unwrap();
    assert_eq!(found, Some(stored));
}

#[tokio::test]
#[serial]
async fn insert_ignores_provided_id() {
    let store = employee_store().await;

    let stored = store
        .insert(Employee::new("Bilbo", "Baggins", "burglar").with_id(EntityId::new(42)))
        .await
        .unwrap();

    assert_eq!(stored.id, Some(EntityId::new(1)));
}

#[tokio::test]
#[serial]
async fn find_missing_returns_none() {
    let store = employee_store().await;
    assert!(store.find_by_id(EntityId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn find_all_returns_rows_in_id_order() {
    let store = employee_store().await;
    store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();
    store
        .insert(Employee::new("Frodo", "Baggins", "thief"))
        .await
        .unwrap();

    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].first_name, "Bilbo");
    assert_eq!(all[1].first_name, "Frodo");
}

#[tokio::test]
#[serial]
async fn save_updates_existing_row() {
    let store = employee_store().await;
    let mut stored = store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();
    stored.role = "ring bearer".to_string();

    store.save(stored).await.unwrap();

    let found = store.find_by_id(EntityId::new(1)).await.unwrap().unwrap();
    assert_eq!(found.role, "ring bearer");
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn save_under_new_id_creates_and_advances_sequence() {
    let store = employee_store().await;

    let saved = store
        .save(Employee::new("Samwise", "Gamgee", "gardener").with_id(EntityId::new(10)))
        .await
        .unwrap();
    assert_eq!(saved.id, Some(EntityId::new(10)));

    let next = store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();
    assert_eq!(next.id, Some(EntityId::new(11)));
}

#[tokio::test]
#[serial]
async fn insert_after_save_at_max_id_fails() {
    let store = employee_store().await;
    let max = EntityId::new(i64::MAX);

    let saved = store
        .save(Employee::new("Samwise", "Gamgee", "gardener").with_id(max))
        .await
        .unwrap();
    assert_eq!(saved.id, Some(max));

    let result = store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await;
    assert!(matches!(
        result,
        Err(StoreError::IdsExhausted { entity: "employee" })
    ));

    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.find_by_id(max).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn delete_is_idempotent() {
    let store = employee_store().await;
    store
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();

    assert!(store.delete_by_id(EntityId::new(1)).await.unwrap());
    assert!(!store.delete_by_id(EntityId::new(1)).await.unwrap());
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
#[serial]
async fn order_status_round_trips_through_column() {
    let store: PostgresEntityStore<Order> = PostgresEntityStore::new(get_test_pool().await);

    let stored = store
        .insert(Order::new("MacBook Pro", Status::Completed))
        .await
        .unwrap();
    let id = stored.id.unwrap();

    let found = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.status, Status::Completed);

    store
        .save(Order::new("MacBook Pro 16", Status::InProgress).with_id(id))
        .await
        .unwrap();
    let found = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.description, "MacBook Pro 16");
    assert_eq!(found.status, Status::InProgress);
}

#[tokio::test]
#[serial]
async fn stores_share_one_pool() {
    let pool = get_test_pool().await;
    let employees: PostgresEntityStore<Employee> = PostgresEntityStore::new(pool.clone());
    let orders: PostgresEntityStore<Order> = PostgresEntityStore::new(pool);

    employees
        .insert(Employee::new("Bilbo", "Baggins", "burglar"))
        .await
        .unwrap();

    assert_eq!(employees.count().await.unwrap(), 1);
    assert_eq!(orders.count().await.unwrap(), 0);
}
