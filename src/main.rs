//! GitLab MCP Server
//!
//! A Model Context Protocol server for the GitLab REST API.

use clap::Parser;
use gitlab_mcp::{
    AppConfig, Cli, GitLabMcpHandler, TransportMode,
    gitlab::GitLabClient,
    transport::{HttpConfig, run_http_blocking, run_stdio},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; the environment wins on conflicts
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the protocol in stdio mode
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting GitLab MCP server"
    );

    let config = AppConfig::from_cli(cli)
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    let gitlab = Arc::new(
        GitLabClient::new(&config.gitlab)
            .inspect_err(|e| error!(error = %e, "Failed to create GitLab client"))?,
    );

    match config.server.transport {
        TransportMode::Stdio => {
            let handler = GitLabMcpHandler::new_with_shared(&config, gitlab);
            run_stdio(handler).await?;
        }
        TransportMode::Sse => {
            let http_config = HttpConfig::from_host_port(&config.server.host, config.server.port)?;

            // Each SSE session gets its own handler over the shared client
            let config = Arc::new(config);
            run_http_blocking(
                move || GitLabMcpHandler::new_with_shared(&config, gitlab.clone()),
                http_config,
            )
            .await?;
        }
    }

    Ok(())
}
