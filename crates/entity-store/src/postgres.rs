use std::marker::PhantomData;

use async_trait::async_trait;
use domain::{Employee, Entity, Order, Status};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

pub use sqlx::PgPool;

use crate::{
    EntityId, Result, StoreError,
    store::{EntityStore, record_operation},
};

/// Builds a PostgreSQL connection pool.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Table mapping for an entity persisted in PostgreSQL.
///
/// Every table has a `BIGSERIAL` primary key named `id`; `COLUMNS` lists the
/// remaining (mutable) columns in the order `bind_columns` binds them.
pub trait PgEntity: Entity {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &PgRow) -> Result<Self>;

    fn bind_columns<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments>;
}

impl PgEntity for Employee {
    const TABLE: &'static str = "employee";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name", "role"];

    fn from_row(row: &PgRow) -> Result<Self> {
        Ok(Employee {
            id: Some(EntityId::new(row.try_get("id")?)),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            role: row.try_get("role")?,
        })
    }

    fn bind_columns<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.first_name.clone())
            .bind(self.last_name.clone())
            .bind(self.role.clone())
    }
}

impl PgEntity for Order {
    const TABLE: &'static str = "customer_order";
    const COLUMNS: &'static [&'static str] = &["description", "status"];

    fn from_row(row: &PgRow) -> Result<Self> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<Status>()
            .map_err(|e| StoreError::InvalidRow {
                table: Self::TABLE,
                reason: e.to_string(),
            })?;

        Ok(Order {
            id: Some(EntityId::new(row.try_get("id")?)),
            description: row.try_get("description")?,
            status,
        })
    }

    fn bind_columns<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.description.clone())
            .bind(self.status.as_str())
    }
}

/// PostgreSQL-backed entity store implementation.
pub struct PostgresEntityStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresEntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: PgEntity> PostgresEntityStore<E> {
    /// Creates a new PostgreSQL entity store on a shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn column_list() -> String {
        E::COLUMNS.join(", ")
    }

    // Placeholders for the mutable columns, numbered from `first`.
    fn placeholders(first: usize) -> String {
        (first..first + E::COLUMNS.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl<E: PgEntity> EntityStore<E> for PostgresEntityStore<E> {
    async fn insert(&self, entity: E) -> Result<E> {
        record_operation(E::KIND, "insert");
        let columns = Self::column_list();
        let sql = format!(
            "INSERT INTO {table} ({columns}) VALUES ({values}) RETURNING id, {columns}",
            table = E::TABLE,
            values = Self::placeholders(1),
        );

        let row = entity
            .bind_columns(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // sequence_generator_limit_exceeded
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.code().as_deref() == Some("2200H")
                {
                    return StoreError::IdsExhausted { entity: E::KIND };
                }
                StoreError::Database(e)
            })?;

        E::from_row(&row)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<E>> {
        record_operation(E::KIND, "find_by_id");
        let sql = format!(
            "SELECT id, {columns} FROM {table} WHERE id = $1",
            columns = Self::column_list(),
            table = E::TABLE,
        );

        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(E::from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        record_operation(E::KIND, "find_all");
        let sql = format!(
            "SELECT id, {columns} FROM {table} ORDER BY id ASC",
            columns = Self::column_list(),
            table = E::TABLE,
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(E::from_row).collect()
    }

    async fn save(&self, entity: E) -> Result<E> {
        let Some(id) = entity.id() else {
            return self.insert(entity).await;
        };
        record_operation(E::KIND, "save");

        let columns = Self::column_list();
        let updates = E::COLUMNS
            .iter()
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let upsert = format!(
            r#"
            INSERT INTO {table} (id, {columns}) VALUES ($1, {values})
            ON CONFLICT (id) DO UPDATE SET {updates}
            RETURNING id, {columns}
            "#,
            table = E::TABLE,
            values = Self::placeholders(2),
        );
        // Keep the id sequence ahead of explicitly chosen identifiers.
        let sync_sequence = format!(
            "SELECT setval('{table}_id_seq', GREATEST($1, (SELECT last_value FROM {table}_id_seq)))",
            table = E::TABLE,
        );

        let mut tx = self.pool.begin().await?;

        let row = entity
            .bind_columns(sqlx::query(&upsert).bind(id.as_i64()))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(&sync_sequence)
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(entity = E::KIND, %id, "upserted row");
        E::from_row(&row)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool> {
        record_operation(E::KIND, "delete_by_id");
        let sql = format!("DELETE FROM {table} WHERE id = $1", table = E::TABLE);

        let result = sqlx::query(&sql)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize> {
        record_operation(E::KIND, "count");
        let sql = format!("SELECT COUNT(*) FROM {table}", table = E::TABLE);

        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
