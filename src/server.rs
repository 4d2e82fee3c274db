//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the daily reset scheduler and the
//! Axum server lifecycle.

use crate::application::jobs::DailyResetScheduler;
use crate::config::Config;
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::infrastructure::persistence::{PgAnalyticsRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the connection pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the PostgreSQL repositories with the configured store timeout.
///
/// The bulk daily reset is bounded by `RESET_TIMEOUT_SECS` rather than
/// `STORE_TIMEOUT_SECS`.
pub fn repositories(
    pool: PgPool,
    config: &Config,
) -> (Arc<dyn LinkRepository>, Arc<dyn AnalyticsRepository>) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(Arc::clone(&pool))
        .with_timeout(config.store_timeout())
        .with_reset_timeout(config.retry_policy().attempt_timeout);
    let analytics = PgAnalyticsRepository::new(pool).with_timeout(config.store_timeout());

    (Arc::new(links), Arc::new(analytics))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Daily reset scheduler
/// - Axum HTTP server, until Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let (links, analytics) = repositories(pool, &config);

    let reset = DailyResetScheduler::new(Arc::clone(&links), config.reset_zone())
        .with_policy(config.retry_policy())
        .start();

    let state = AppState::new(
        links,
        analytics,
        config.code_generator(),
        config.base_url.clone(),
    )
    .with_reset_state(reset.subscribe());

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped, stopping daily reset scheduler");
    reset.stop();
    reset.join().await.context("Daily reset scheduler panicked")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
