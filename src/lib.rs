//! GitLab MCP Server
//!
//! A Model Context Protocol server for the GitLab REST API.
//!
//! ## Features
//!
//! - **24 GitLab tools** covering repositories, files, branches, commits,
//!   issues, merge requests, wikis, members, and issue discussions
//! - **Read-only mode** that hides and rejects every mutating tool
//! - **Multiple transports** - stdio for local clients, HTTP/SSE for web
//!   integrations
//! - **Pre-network validation** of pagination and timestamp arguments, so
//!   malformed calls never reach GitLab
//!
//! ## Configuration
//!
//! Everything comes from the environment (or equivalent CLI flags):
//!
//! ```text
//! GITLAB_PERSONAL_ACCESS_TOKEN   required, the API token
//! GITLAB_API_URL                 default https://gitlab.com/api/v4
//! GITLAB_READ_ONLY_MODE          hide mutating tools
//! USE_SSE                        serve over HTTP/SSE instead of stdio
//! PORT                           SSE port, default 3000
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod gitlab;
pub mod server;
pub mod tools;
pub mod transport;
pub mod util;

// Re-export main types
pub use config::{AppConfig, Cli, TransportMode};
pub use error::{AppError, Result};
pub use server::GitLabMcpHandler;
