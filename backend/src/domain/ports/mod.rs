//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod row_store;
mod table_access;

#[cfg(test)]
pub use row_store::MockRowStore;
pub use row_store::{Condition, OrderBy, RowKey, RowStore, RowStoreError, Select};
#[cfg(test)]
pub use table_access::MockTableAccess;
pub use table_access::TableAccess;
