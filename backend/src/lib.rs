//! ClientFlow data-access backend.
//!
//! A registry of the agency's tables, a translator between the storage
//! naming convention (snake_case) and the application convention
//! (camelCase), and one generic set of query and mutation operations that
//! works against any registered table. Operations run over a [`RowStore`]
//! adapter: PostgreSQL through Diesel, or an in-memory store for development
//! and tests. An actix-web adapter exposes them as JSON endpoints.
//!
//! [`RowStore`]: domain::ports::RowStore

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
