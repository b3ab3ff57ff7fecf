use super::routes::create_router;
use super::state::AppState;
use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the listener described by `[service.http]`
pub async fn bind(config: &ServiceConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", config.http.bind, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let local: SocketAddr = listener.local_addr()?;
    info!("{} listening on {}", config.name, local);

    Ok(listener)
}

/// Serve the control surface until the listener fails
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app)
        .await
        .context("HTTP server stopped")?;

    info!("HTTP server shutdown complete");
    Ok(())
}
