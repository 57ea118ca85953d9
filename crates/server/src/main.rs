//! barabild server entry point.
//!
//! Loads configuration, wires the cache, upstream fetcher and resolver
//! together, and serves the HTTP API. Logs are emitted as JSON.

use std::sync::Arc;

use anyhow::Result;
use barabild_client::{Resolver, build_fetcher};
use barabild_core::{AppConfig, CacheStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod middleware;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load()?;

    let cache = CacheStore::new(&config.cache_dir, config.cache_ttl());
    let fetcher = build_fetcher(&config)?;
    let state = handler::AppState { resolver: Arc::new(Resolver::new(cache, fetcher)) };

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        provider = ?config.provider,
        cache_dir = %state.resolver.cache().dir().display(),
        "Starting barabild server"
    );

    axum::serve(listener, handler::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
