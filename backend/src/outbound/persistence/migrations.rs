//! Embedded schema migrations for the ClientFlow tables.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking migration task did not complete.
    #[error("migration task aborted: {message}")]
    Task { message: String },
}

/// Apply all pending migrations, returning how many ran.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking pool through an async connection wrapper.
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url).map_err(
            |err| MigrationError::Connect {
                message: err.to_string(),
            },
        )?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| MigrationError::Task {
        message: err.to_string(),
    })??;
    info!(applied, "database migrations complete");
    Ok(applied)
}
