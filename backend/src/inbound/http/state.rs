//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the data-access port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TableAccess;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Generic table operations.
    pub tables: Arc<dyn TableAccess>,
}

impl HttpState {
    /// Construct state from the data-access port.
    pub fn new(tables: Arc<dyn TableAccess>) -> Self {
        Self { tables }
    }
}
