//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the blacklist cleanup task and the
//! Axum server lifecycle.

use crate::config::Config;
use crate::routes::app_router;
use crate::state::{AppAuthService, AppState};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

const CONNECT_ATTEMPTS: usize = 5;

/// Opens the connection pool, retrying with exponential backoff while the
/// database comes up.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS);

    let options = &options;
    let url = config.database_url.as_str();

    Retry::spawn(strategy, || async move {
        options
            .clone()
            .connect(url)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Database connection failed, retrying"))
    })
    .await
    .context("Failed to connect to database")
}

/// Purges expired blacklist rows every `interval` until the process exits.
pub async fn run_blacklist_cleanup(auth_service: Arc<AppAuthService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        match auth_service.cleanup_expired_tokens().await {
            Ok(0) => tracing::debug!("Blacklist cleanup: nothing to purge"),
            Ok(removed) => tracing::info!(removed, "Blacklist cleanup purged expired tokens"),
            Err(e) => tracing::error!(error = %e, "Blacklist cleanup failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background blacklist cleanup
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = AppState::new(Arc::new(pool), config.jwt_codec());

    tokio::spawn(run_blacklist_cleanup(
        state.auth_service.clone(),
        Duration::from_secs(config.blacklist_cleanup_interval_secs),
    ));
    tracing::info!("Blacklist cleanup task started");

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

