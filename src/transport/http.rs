//! HTTP/SSE transport
//!
//! Runs the MCP server over HTTP with Server-Sent Events (SSE). Each SSE
//! session gets its own handler from the factory; they share one GitLab
//! client underneath.

use crate::server::GitLabMcpHandler;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default port for HTTP/SSE transport
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Configuration for the HTTP/SSE server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:3000")
    pub bind: SocketAddr,
    /// Path for SSE endpoint (default: "/sse")
    pub sse_path: String,
    /// Path for message posting (default: "/message")
    pub post_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
            sse_path: "/sse".to_string(),
            post_path: "/message".to_string(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with the specified bind address
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Default::default()
        }
    }

    /// Create config from host and port strings
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, std::net::AddrParseError> {
        let addr: SocketAddr = format!("{host}:{port}").parse()?;
        Ok(Self::new(addr))
    }
}

/// Run the MCP server using HTTP/SSE transport.
///
/// Binding is strict: if the configured port is taken the server fails
/// instead of drifting to another port clients would not know about.
///
/// Returns a cancellation token that can be used to stop the server.
pub async fn run_http<F>(
    handler_factory: F,
    config: HttpConfig,
) -> anyhow::Result<CancellationToken>
where
    F: Fn() -> GitLabMcpHandler + Send + Sync + 'static,
{
    info!(
        "Starting GitLab MCP server with HTTP/SSE transport on {}",
        config.bind
    );

    let ct = CancellationToken::new();

    let sse_config = SseServerConfig {
        bind: config.bind,
        sse_path: config.sse_path,
        post_path: config.post_path,
        ct: ct.clone(),
        sse_keep_alive: None,
    };

    let sse_server = SseServer::serve_with_config(sse_config).await?;

    info!(
        "HTTP/SSE server listening on http://{}",
        sse_server.config.bind
    );
    info!("  SSE endpoint: {}", sse_server.config.sse_path);
    info!("  Message endpoint: {}", sse_server.config.post_path);

    let server_ct = sse_server.with_service(handler_factory);

    Ok(server_ct)
}

/// Run the MCP server using HTTP/SSE transport and wait for shutdown.
pub async fn run_http_blocking<F>(handler_factory: F, config: HttpConfig) -> anyhow::Result<()>
where
    F: Fn() -> GitLabMcpHandler + Send + Sync + 'static,
{
    let ct = run_http(handler_factory, config).await?;

    info!("Press Ctrl+C to stop the server");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = ct.cancelled() => {
            info!("Server cancelled");
        }
    }

    ct.cancel();

    info!("HTTP/SSE server stopped");
    Ok(())
}
