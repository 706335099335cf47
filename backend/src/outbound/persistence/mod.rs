//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! [`DieselRowStore`] implements the row store port against PostgreSQL via
//! `diesel-async` with `bb8` connection pooling. Table and column names come
//! from the registry's schemas, so there is no generated Diesel `schema.rs`;
//! statements are rendered per call and values travel as bound `jsonb`.
//!
//! # Example
//!
//! ```no_run
//! use clientflow::outbound::persistence::{DbPool, DieselRowStore, PoolConfig};
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PoolConfig::new("postgres://localhost/clientflow");
//! let pool = DbPool::new(config).await?;
//! let _store = DieselRowStore::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_row_store;
mod error_mapping;
mod migrations;
mod pool;
mod sql;

pub use diesel_row_store::DieselRowStore;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
