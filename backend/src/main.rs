//! ClientFlow entry-point: loads settings, wires the row store, and serves the
//! table endpoints, health probes, and (in debug builds) OpenAPI docs.

mod server;

use actix_web::web;
use clientflow::inbound::http::health::HealthState;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
