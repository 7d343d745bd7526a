//! jobswipe server entry point.
//!
//! Loads configuration, opens the job store and serves the HTTP API until
//! Ctrl-C. Logs are JSON on stderr, filtered by `RUST_LOG`.

use std::sync::Arc;

use anyhow::Result;
use jobswipe_client::{JobtechClient, JobtechConfig};
use jobswipe_core::{AppConfig, JobStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod services;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let store = JobStore::open(&config.db_path, config.busy_timeout()).await?;
    let client = JobtechClient::new(JobtechConfig::from(&config))?;
    let state = handler::AppState::new(store.clone(), Arc::new(client), config.cache_ttl());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        db_path = %config.db_path.display(),
        cache_ttl_seconds = config.cache_ttl_seconds,
        "Starting jobswipe server"
    );

    axum::serve(listener, handler::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing store");
    store.close().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}
