//! PostgreSQL-backed `RowStore` implementation.
//!
//! Statements are rendered by [`super::sql`] from the table's schema and run
//! as raw queries. Every statement returns one `jsonb` document per row, which
//! is re-keyed from SQL columns to internal field names before it leaves the
//! adapter.

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::sql_query;
use diesel::sql_types::Jsonb;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{Condition, RowKey, RowStore, RowStoreError, Select};
use crate::domain::{Row, TableSchema};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::sql::{self, Statement};

/// One `to_jsonb(t)` document.
#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Jsonb)]
    data: Value,
}

/// Diesel-backed implementation of the [`RowStore`] port.
#[derive(Clone)]
pub struct DieselRowStore {
    pool: DbPool,
}

impl DieselRowStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run(&self, table: &TableSchema, statement: Statement) -> Result<Vec<Row>, RowStoreError> {
        debug!(table = %table.name(), sql = statement.sql.as_str(), "running statement");
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut binds = statement.binds.into_iter();
        let query = sql_query(statement.sql);
        let rows: Vec<JsonRow> = match (binds.next(), binds.next()) {
            (None, _) => query.load(&mut conn).await,
            (Some(first), None) => query.bind::<Jsonb, _>(first).load(&mut conn).await,
            (Some(first), Some(second)) => {
                query
                    .bind::<Jsonb, _>(first)
                    .bind::<Jsonb, _>(second)
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| sql::from_columns(table, row.data))
            .collect())
    }

    async fn run_one(
        &self,
        table: &TableSchema,
        statement: Statement,
    ) -> Result<Option<Row>, RowStoreError> {
        Ok(self.run(table, statement).await?.into_iter().next())
    }

    async fn find(&self, table: &TableSchema, key: &RowKey) -> Result<Option<Row>, RowStoreError> {
        let select = Select {
            conditions: vec![Condition::Equals {
                field: key.field,
                value: key.value.clone(),
            }],
            order: None,
            limit: Some(1),
        };
        self.run_one(table, sql::render_select(table, &select)).await
    }
}

fn missing_row(table: &TableSchema) -> RowStoreError {
    RowStoreError::query(format!("{} write returned no row", table.name()))
}

#[async_trait]
impl RowStore for DieselRowStore {
    async fn select(&self, table: &TableSchema, select: &Select) -> Result<Vec<Row>, RowStoreError> {
        self.run(table, sql::render_select(table, select)).await
    }

    async fn insert(&self, table: &TableSchema, row: Row) -> Result<Row, RowStoreError> {
        self.run_one(table, sql::render_insert(table, row))
            .await?
            .ok_or_else(|| missing_row(table))
    }

    async fn update(
        &self,
        table: &TableSchema,
        key: &RowKey,
        changes: Row,
    ) -> Result<Option<Row>, RowStoreError> {
        match sql::render_update(table, key, changes) {
            Some(statement) => self.run_one(table, statement).await,
            None => self.find(table, key).await,
        }
    }

    async fn delete(&self, table: &TableSchema, key: &RowKey) -> Result<Option<Row>, RowStoreError> {
        match sql::render_delete(table, key) {
            Some(statement) => self.run_one(table, statement).await,
            None => Ok(None),
        }
    }

    async fn upsert(
        &self,
        table: &TableSchema,
        row: Row,
        conflict_field: &'static str,
    ) -> Result<Row, RowStoreError> {
        let statement = sql::render_upsert(table, row, conflict_field).ok_or_else(|| {
            RowStoreError::query(format!(
                "{} has no field {conflict_field}",
                table.name()
            ))
        })?;
        self.run_one(table, statement)
            .await?
            .ok_or_else(|| missing_row(table))
    }
}
