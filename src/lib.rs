pub mod api;
pub mod config;
pub mod ingest;
pub mod qa;
pub mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::qa::registry::ModelRegistry;

/// Start the service: load config, populate the model registry, serve HTTP.
///
/// Registry population is synchronous and runs to completion before the
/// listener accepts its first connection. A registry construction failure is
/// fatal and propagates to the caller.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("docqa starting v{}", config::APP_VERSION);

    let app_config = AppConfig::from_env();
    let bind_addr = app_config.socket_addr()?;

    // Blocking startup: PDF ingestion and index construction are CPU-bound,
    // and the generator client is a blocking reqwest client.
    let registry = tokio::task::spawn_blocking(move || ModelRegistry::init(&app_config))
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, "Unable to init model registry");
            e
        })?;

    let mut server = api::server::start_api_server(Arc::new(registry), bind_addr).await?;
    tracing::info!(addr = %server.addr, "docqa serving");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.shutdown();

    Ok(())
}
