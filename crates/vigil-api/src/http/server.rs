use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::routes::api_router;
use crate::http::state::ApiState;

/// Listen configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Serve the API until the cancellation token fires, then drain in-flight
/// requests and return.
pub async fn run_http_server(
    config: HttpServerConfig,
    state: ApiState,
    cancellation_token: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid HTTP listen address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;

    info!(%addr, "HTTP server listening");

    axum::serve(listener, api_router(state))
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}
