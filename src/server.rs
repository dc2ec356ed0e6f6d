//! HTTP server initialization and runtime setup.
//!
//! Loads the registry, builds the telemetry client and runs the Axum server
//! until a shutdown signal arrives.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::persistence::JsonFileStore;
use crate::infrastructure::telemetry::TelemetryClient;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Telemetry client (remote delivery only when a collector is configured)
/// - Link registry loaded from the JSON data file
/// - Axum HTTP server with graceful shutdown
///
/// Pending telemetry is delivered before returning.
///
/// # Errors
///
/// Returns an error if:
/// - The telemetry HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let telemetry = TelemetryClient::from_config(&config.telemetry)
        .context("Failed to build telemetry client")?;
    if telemetry.is_enabled() {
        tracing::info!("Telemetry delivery enabled");
    } else {
        tracing::info!("Telemetry delivery disabled (local log only)");
    }

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let links = LinkService::load(store, telemetry.clone());
    tracing::info!("Registry loaded with {} links", links.len());

    let state = AppState::new(links, telemetry.clone(), &config.base_url);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, flushing telemetry");
    telemetry.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
