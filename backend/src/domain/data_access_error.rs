//! Errors raised by the generic data-access operations.

use super::UnknownTableName;
use super::ports::RowStoreError;

/// Failure of a data-access call.
///
/// Store failures pass through unchanged inside [`DataAccessError::Store`];
/// nothing in the layer retries or substitutes defaults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataAccessError {
    /// The logical table name is not registered.
    #[error("unknown table: {name}")]
    UnknownTable {
        /// Name as supplied by the caller.
        name: String,
    },
    /// No row matched the identity value.
    #[error("no row in {table} with identity {id}")]
    NotFound {
        /// Logical table name.
        table: String,
        /// Identity value as supplied by the caller.
        id: String,
    },
    /// The upsert conflict target is not the identity or a unique field.
    #[error("{field} is not a valid conflict target for {table}")]
    Conflict {
        /// Logical table name.
        table: String,
        /// Requested conflict field.
        field: String,
    },
    /// Strict field policy rejected a name the table does not declare.
    #[error("{table} has no field named {field}")]
    UnmappedField {
        /// Logical table name.
        table: String,
        /// Offending field name as supplied by the caller.
        field: String,
    },
    /// The row store failed.
    #[error(transparent)]
    Store(#[from] RowStoreError),
}

impl DataAccessError {
    /// Construct [`DataAccessError::NotFound`].
    pub fn not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            id: id.into(),
        }
    }

    /// Construct [`DataAccessError::Conflict`].
    pub fn conflict(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Conflict {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Construct [`DataAccessError::UnmappedField`].
    pub fn unmapped_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnmappedField {
            table: table.into(),
            field: field.into(),
        }
    }
}

impl From<UnknownTableName> for DataAccessError {
    fn from(err: UnknownTableName) -> Self {
        Self::UnknownTable { name: err.name }
    }
}
