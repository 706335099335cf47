//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from a `CLIENTFLOW_*` environment variable, a
//! configuration file, or a command-line flag.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Configuration values for the HTTP server and its row store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLIENTFLOW")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Reject field names the addressed table does not declare.
    #[ortho_config(default = false)]
    pub strict_fields: bool,
    /// Apply pending migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Return the pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Return the connection checkout timeout.
    pub fn pool_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_secs.unwrap_or(DEFAULT_POOL_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "CLIENTFLOW_BIND_ADDR",
        "CLIENTFLOW_DATABASE_URL",
        "CLIENTFLOW_POOL_MAX_SIZE",
        "CLIENTFLOW_POOL_TIMEOUT_SECS",
        "CLIENTFLOW_STRICT_FIELDS",
        "CLIENTFLOW_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("clientflow")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(settings.pool_timeout(), Duration::from_secs(30));
        assert!(!settings.strict_fields);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLIENTFLOW_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CLIENTFLOW_DATABASE_URL",
                Some("postgres://localhost/clientflow".to_owned()),
            ),
            ("CLIENTFLOW_POOL_MAX_SIZE", Some("4".to_owned())),
            ("CLIENTFLOW_POOL_TIMEOUT_SECS", Some("5".to_owned())),
            ("CLIENTFLOW_STRICT_FIELDS", Some("true".to_owned())),
            ("CLIENTFLOW_RUN_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address parses"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/clientflow")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.pool_timeout(), Duration::from_secs(5));
        assert!(settings.strict_fields);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("CLIENTFLOW_BIND_ADDR", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
