//! Driven port for the storage engine behind the data-access layer.
//!
//! Rows crossing this boundary are always keyed by internal (camelCase)
//! field names. Adapters own the mapping to physical columns and must
//! ignore keys that are not fields of the addressed table.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Row, SortDirection, TableSchema};

use super::define_port_error;

define_port_error! {
    /// Errors raised by row store adapters.
    pub enum RowStoreError {
        /// The store could not be reached.
        Connection { message: String } => "row store connection failed: {message}",
        /// A statement failed for a reason other than a constraint.
        Query { message: String } => "row store query failed: {message}",
        /// A write violated a uniqueness, foreign key, not-null, or check
        /// constraint.
        Constraint { message: String } => "row store constraint violated: {message}",
        /// A value could not be read as its column's type.
        InvalidValue { message: String } => "row store rejected a value: {message}",
    }
}

/// One predicate of a select; predicates combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field = value`. Never matches a NULL field.
    Equals {
        /// Internal field name.
        field: &'static str,
        /// Value compared using the column's type.
        value: Value,
    },
    /// `field IS NULL`.
    IsNull {
        /// Internal field name.
        field: &'static str,
    },
}

/// Ordering clause of a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    /// Internal field name.
    pub field: &'static str,
    /// Direction of the ordering.
    pub direction: SortDirection,
}

/// A fully resolved read against one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    /// Conjunctive predicates.
    pub conditions: Vec<Condition>,
    /// Optional ordering; store order otherwise.
    pub order: Option<OrderBy>,
    /// Optional row cap.
    pub limit: Option<u32>,
}

/// Identity match for single-row writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    /// Internal name of the identity field.
    pub field: &'static str,
    /// Identity value.
    pub value: Value,
}

impl RowKey {
    /// Key `schema`'s rows by its identity field.
    pub fn identity(schema: &TableSchema, value: impl Into<Value>) -> Self {
        Self {
            field: schema.identity_field(),
            value: value.into(),
        }
    }
}

/// Port for reading and writing rows of registered tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Return rows matching `select`.
    async fn select(&self, table: &TableSchema, select: &Select)
    -> Result<Vec<Row>, RowStoreError>;

    /// Insert one row, returning it with store-generated values filled in.
    async fn insert(&self, table: &TableSchema, row: Row) -> Result<Row, RowStoreError>;

    /// Overwrite `changes` on the row matching `key`; `None` when no row
    /// matches.
    async fn update(
        &self,
        table: &TableSchema,
        key: &RowKey,
        changes: Row,
    ) -> Result<Option<Row>, RowStoreError>;

    /// Remove the row matching `key`, returning it; `None` when no row
    /// matches.
    async fn delete(&self, table: &TableSchema, key: &RowKey)
    -> Result<Option<Row>, RowStoreError>;

    /// Insert `row`, or overwrite the existing row sharing its
    /// `conflict_field` value with the fields `row` carries.
    async fn upsert(
        &self,
        table: &TableSchema,
        row: Row,
        conflict_field: &'static str,
    ) -> Result<Row, RowStoreError>;
}
