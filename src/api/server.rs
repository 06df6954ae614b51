//! API server lifecycle.
//!
//! Bind → spawn background task → return a handle with a shutdown channel.
//! The caller builds the model registry first; by the time the listener is
//! bound the registry is complete, so requests never observe a half-built
//! registry.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::qa::registry::ModelRegistry;

use super::routes::api_router;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the API server on the given address.
///
/// Binds, mounts the router over the shared registry, and spawns the axum
/// server in a background task. Returns the handle with the bound address
/// (useful with port 0 in tests).
pub async fn start_api_server(
    registry: Arc<ModelRegistry>,
    addr: SocketAddr,
) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "API server binding");

    let app = api_router(registry);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
