//! Diesel and pool error mapping for the row store adapter.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RowStoreError;

use super::pool::PoolError;

/// Prefix of Postgres `invalid_text_representation` messages, raised when a
/// bound value does not parse as its column's type (a malformed UUID id, for
/// example). Diesel reports these as `DatabaseErrorKind::Unknown`.
const INVALID_INPUT_SYNTAX: &str = "invalid input syntax";

/// Pool failures mean the database is unreachable.
pub(crate) fn map_pool_error(error: PoolError) -> RowStoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    RowStoreError::connection(message)
}

/// Classify a Diesel error; database detail is logged, not returned.
pub(crate) fn map_diesel_error(error: DieselError) -> RowStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::CheckViolation => RowStoreError::constraint(
                info.constraint_name()
                    .map_or_else(|| format!("{kind:?}"), |name| format!("{kind:?} on {name}")),
            ),
            DatabaseErrorKind::ClosedConnection => {
                RowStoreError::connection("database connection error")
            }
            _ if info.message().starts_with(INVALID_INPUT_SYNTAX) => {
                RowStoreError::invalid_value(info.message())
            }
            _ => RowStoreError::query("database error"),
        },
        DieselError::QueryBuilderError(_) => RowStoreError::query("database query error"),
        DieselError::DeserializationError(_) => RowStoreError::query("unreadable row"),
        _ => RowStoreError::query("database error"),
    }
}
