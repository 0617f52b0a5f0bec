//! Pojok Server Library
//!
//! CRUD endpoints over users, profiles, categories and posts, backed by
//! SQLite through sqlx.

pub mod auth;
pub mod core;
pub mod db;
pub mod handlers;
pub mod models;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::{AppState, ServerConfig};
use crate::db::Db;

/// Install the fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber installed earlier (tests, embedding) wins.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Router with state and middleware applied.
pub fn build_app(state: AppState) -> Router {
    crate::core::router()
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Open the database named by `config` and create the tables.
pub async fn connect(config: &ServerConfig) -> anyhow::Result<Db> {
    if let Some(path) = config.database_file() {
        pojok_common::ensure_parent(&path)?;
    }

    let db = Db::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;
    db.init_schema().await.context("failed to create schema")?;
    Ok(db)
}

/// Serve `state` on `listener` until `shutdown` resolves, then close the pool.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let db = state.db.clone();
    let app = build_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    db.close().await;
    info!("Database pool closed");
    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== Pojok Server ===");

    let config = ServerConfig::from_env()?;
    let db = connect(&config).await?;
    info!("Database ready at {}", config.database_url);

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    info!("Server is running on http://localhost:{}", config.port);

    let state = AppState::new(config, db);
    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
