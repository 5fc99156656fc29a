//! Application configuration
//!
//! All configuration comes from the environment (optionally via a `.env`
//! file loaded in `main`) and command-line flags. It is materialized into a
//! single immutable [`AppConfig`] at startup and shared by reference; nothing
//! reads environment variables after this point.

use crate::error::{ConfigError, Result};
use crate::util::SecretString;
use clap::Parser;

const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";

/// Command-line interface, with environment fallbacks for every flag
#[derive(Parser, Debug)]
#[command(name = "gitlab-mcp", version, about = "MCP server for the GitLab API")]
pub struct Cli {
    /// GitLab personal access token (required)
    #[arg(long, env = "GITLAB_PERSONAL_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitLab REST API
    #[arg(long, env = "GITLAB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Serve over HTTP/SSE instead of stdio
    #[arg(long, env = "USE_SSE", default_value_t = false)]
    pub sse: bool,

    /// Bind address for the SSE transport
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the SSE transport
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Hide mutating tools and reject their invocation
    #[arg(long, env = "GITLAB_READ_ONLY_MODE", default_value_t = false)]
    pub read_only: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "GITLAB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Immutable application configuration, built once at startup
#[derive(Debug)]
pub struct AppConfig {
    pub gitlab: GitLabConfig,
    pub server: ServerConfig,
    /// When set, mutating tools are absent from the catalog and rejected
    /// before any upstream request is made
    pub read_only: bool,
}

/// GitLab connection settings
#[derive(Debug)]
pub struct GitLabConfig {
    /// API base URL without a trailing slash
    pub api_url: String,
    pub token: SecretString,
    pub timeout_secs: u64,
}

/// MCP server identity and transport selection
#[derive(Debug)]
pub struct ServerConfig {
    pub transport: TransportMode,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Sse,
}

impl AppConfig {
    /// Validate the parsed CLI and build the immutable configuration.
    ///
    /// A missing token is fatal: there is no anonymous mode.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let token = cli
            .token
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing {
                field: "GITLAB_PERSONAL_ACCESS_TOKEN".into(),
            })?;

        if cli.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "timeout must be at least 1 second".into(),
            }
            .into());
        }

        Ok(Self {
            gitlab: GitLabConfig {
                api_url: cli.api_url.trim_end_matches('/').to_string(),
                token: SecretString::new(token),
                timeout_secs: cli.timeout_secs,
            },
            server: ServerConfig {
                transport: if cli.sse {
                    TransportMode::Sse
                } else {
                    TransportMode::Stdio
                },
                host: cli.host,
                port: cli.port,
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            read_only: cli.read_only,
        })
    }
}
