//! Driving port: the generic per-table API offered to callers.
//!
//! Everything here speaks the external (snake_case) vocabulary and addresses
//! tables by their logical string name.

use async_trait::async_trait;

use crate::domain::{DataAccessError, QuerySpec, Row, RowPayload};

/// Generic query and mutation operations over registered tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableAccess: Send + Sync {
    /// Rows of `table` matching `spec`.
    async fn query(&self, table: &str, spec: &QuerySpec) -> Result<Vec<Row>, DataAccessError>;

    /// The row of `table` whose identity field equals `id`.
    async fn get(&self, table: &str, id: &str) -> Result<Row, DataAccessError>;

    /// Insert `payload` into `table`.
    async fn insert(&self, table: &str, payload: RowPayload) -> Result<Row, DataAccessError>;

    /// Apply `payload` to the row of `table` identified by `id`.
    async fn update(
        &self,
        table: &str,
        id: &str,
        payload: RowPayload,
    ) -> Result<Row, DataAccessError>;

    /// Delete (soft or hard, per table) the row identified by `id`.
    async fn delete(&self, table: &str, id: &str) -> Result<(), DataAccessError>;

    /// Insert `payload`, or overwrite the row it conflicts with on
    /// `conflict_field` (the identity field when `None`).
    async fn upsert<'a>(
        &self,
        table: &str,
        payload: RowPayload,
        conflict_field: Option<&'a str>,
    ) -> Result<Row, DataAccessError>;
}
