//! Domain layer: the table registry, field-name translation, and the generic
//! data-access operations.
//!
//! Public surface:
//! - `TableRegistry` / `RegisteredTable`: logical name → storage handle and
//!   alias map, built once at start-up.
//! - `ColumnAliasMap`: snake_case ↔ camelCase key translation.
//! - `QuerySpec` / `RowPayload`: per-call read and write inputs.
//! - `DataAccessService`: implements the `TableAccess` driving port over a
//!   `RowStore` driven port.
//! - `Error` / `ErrorCode`: transport-agnostic error payload for adapters.

mod alias;
mod data_access;
mod data_access_error;
pub mod error;
pub mod ports;
mod query_spec;
mod registry;
mod row;
mod schema;
mod table_name;
mod trace_id;

pub use self::alias::{AliasMapError, ColumnAliasMap};
pub use self::data_access::{DataAccessService, FieldPolicy};
pub use self::data_access_error::DataAccessError;
pub use self::error::{Error, ErrorCode};
pub use self::query_spec::{Filter, FilterValue, QuerySpec, Sort, SortDirection};
pub use self::registry::{RegisteredTable, RegistryError, TableRegistry};
pub use self::row::{Row, RowPayload};
pub use self::schema::{
    DeletePolicy, FieldDef, FieldDefault, SchemaError, TableSchema, TableSchemaBuilder,
};
pub use self::table_name::{TableName, UnknownTableName};
pub use self::trace_id::TraceId;

/// HTTP header echoing the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
