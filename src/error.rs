//! Error types for gitlab-mcp
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to appropriate MCP error responses at the boundary.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Tool execution error: {0}")]
    Tool(#[from] ToolError),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error(
        "Missing required configuration: {field}. \
         Set the {field} environment variable and restart."
    )]
    Missing { field: String },
}

/// GitLab API specific errors
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitLab API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Forbidden: insufficient permissions for {action}")]
    Forbidden { action: String },

    /// The upstream payload decoded as JSON but did not match the
    /// expected contract. Reported distinctly from user errors so schema
    /// drift is visible as such.
    #[error("Unexpected GitLab response shape: {0}")]
    SchemaMismatch(String),

    #[error("Invalid response from GitLab: {0}")]
    InvalidResponse(String),
}

impl GitLabError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => GitLabError::Unauthorized,
            403 => GitLabError::Forbidden {
                action: "this operation".into(),
            },
            404 => GitLabError::NotFound {
                resource: "requested resource".into(),
            },
            429 => GitLabError::RateLimited { retry_after: 60 },
            _ => GitLabError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                },
            },
        }
    }
}

/// Tool dispatch and execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Arguments are required")]
    ArgumentsRequired,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{0}' is not available: GitLab API is running in read-only mode")]
    ReadOnly(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// A field-qualified validation error (pre-network)
    pub fn invalid_field(field: &str, message: impl std::fmt::Display) -> Self {
        ToolError::InvalidArguments(format!("{field}: {message}"))
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitlab_error_from_response() {
        assert!(matches!(
            GitLabError::from_response(401, ""),
            GitLabError::Unauthorized
        ));

        assert!(matches!(
            GitLabError::from_response(403, ""),
            GitLabError::Forbidden { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(404, ""),
            GitLabError::NotFound { .. }
        ));

        assert!(matches!(
            GitLabError::from_response(429, ""),
            GitLabError::RateLimited { .. }
        ));

        let api_err = GitLabError::from_response(500, "Internal server error");
        assert!(matches!(api_err, GitLabError::Api { status: 500, .. }));
    }

    #[test]
    fn test_empty_body_falls_back_to_status_text() {
        let err = GitLabError::from_response(502, "");
        assert_eq!(
            err.to_string(),
            "GitLab API error (HTTP 502): HTTP 502"
        );
    }

    #[test]
    fn test_invalid_field_is_field_qualified() {
        let err = ToolError::invalid_field("per_page", "must be between 1 and 100");
        assert_eq!(
            err.to_string(),
            "Invalid arguments: per_page: must be between 1 and 100"
        );
    }
}
