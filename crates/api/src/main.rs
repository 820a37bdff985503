mod auth;
mod bootstrap;
mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use carlton_core::store::{ContentStore, MemoryStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = config::AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting Carlton content API");

    let (store, pool) = open_store(&config).await?;

    if config.admin_token.is_none() {
        tracing::info!("ADMIN_TOKEN not set, only session tokens are accepted");
    }
    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::ensure_admin(store.as_ref(), admin)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to provision admin account: {e}"))?;
    }

    let state = state::AppState::new(store, pool, config.clone());
    let app = middleware::apply(routes::build_router(state), &config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store
/// that forgets everything on restart.
async fn open_store(
    config: &config::AppConfig,
) -> anyhow::Result<(Arc<dyn ContentStore>, Option<PgPool>)> {
    let Some(url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, content is kept in memory and lost on restart");
        return Ok((Arc::new(MemoryStore::new()), None));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;
    tracing::info!("Database migrations applied");

    Ok((Arc::new(PgStore::new(pool.clone())), Some(pool)))
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
