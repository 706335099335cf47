//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use clientflow::Trace;
#[cfg(debug_assertions)]
use clientflow::doc::ApiDoc;
use clientflow::domain::ports::RowStore;
use clientflow::domain::{DataAccessService, FieldPolicy, TableRegistry};
use clientflow::inbound::http::health::{HealthState, live, ready};
use clientflow::inbound::http::json_error_handler;
use clientflow::inbound::http::state::HttpState;
use clientflow::inbound::http::tables;
use clientflow::outbound::memory::InMemoryRowStore;
use clientflow::outbound::persistence::{DbPool, DieselRowStore, PoolConfig, run_migrations};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    bind_addr: SocketAddr,
    http_state: HttpState,
}

/// Build the row store selected by `settings`.
///
/// Uses PostgreSQL when a database URL is configured, applying pending
/// migrations first when asked to; otherwise falls back to the in-memory
/// store.
async fn build_row_store(
    settings: &ServerSettings,
    clock: Arc<dyn Clock>,
) -> io::Result<Arc<dyn RowStore>> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database URL configured; rows are kept in memory");
        return Ok(Arc::new(InMemoryRowStore::new(clock)));
    };

    if settings.run_migrations {
        run_migrations(url).await.map_err(io::Error::other)?;
    }
    let pool = DbPool::new(
        PoolConfig::new(url)
            .with_max_size(settings.pool_max_size())
            .with_connection_timeout(settings.pool_timeout()),
    )
    .await
    .map_err(io::Error::other)?;
    info!(max_size = settings.pool_max_size(), "using PostgreSQL row store");
    Ok(Arc::new(DieselRowStore::new(pool)))
}

impl ServerConfig {
    /// Resolve settings into a ready-to-serve configuration.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the bind address is malformed, the registry
    /// is inconsistent, or the database cannot be prepared.
    pub async fn from_settings(settings: &ServerSettings) -> io::Result<Self> {
        let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
        let registry = Arc::new(TableRegistry::clientflow().map_err(io::Error::other)?);
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let store = build_row_store(settings, clock.clone()).await?;
        let policy = if settings.strict_fields {
            FieldPolicy::Strict
        } else {
            FieldPolicy::Lenient
        };
        info!(tables = registry.tables().count(), ?policy, "table registry ready");
        let service = DataAccessService::new(registry, store, clock).with_policy(policy);
        Ok(Self {
            bind_addr,
            http_state: HttpState::new(Arc::new(service)),
        })
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").configure(tables::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        http_state,
    } = config;
    let http_state = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
