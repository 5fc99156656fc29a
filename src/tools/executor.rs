//! Tool execution primitives
//!
//! Defines the traits and context shared by every tool: static metadata
//! ([`ToolInfo`]), the execution entry point ([`ToolExecutor`]), and the
//! output envelope handed back to the protocol layer.

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Whether a tool reads or mutates GitLab state.
///
/// Write tools are hidden from the catalog and rejected before any
/// upstream request when the server runs in read-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Read,
    Write,
}

/// Static metadata every tool carries
pub trait ToolInfo {
    fn name() -> &'static str;
    fn description() -> &'static str;
    fn operation_type() -> OperationType;
}

/// Implement [`ToolInfo`] for a tool struct.
#[macro_export]
macro_rules! tool_info {
    ($ty:ty, $name:literal, $desc:literal, $op:ident) => {
        impl $crate::tools::ToolInfo for $ty {
            fn name() -> &'static str {
                $name
            }
            fn description() -> &'static str {
                $desc
            }
            fn operation_type() -> $crate::tools::OperationType {
                $crate::tools::OperationType::$op
            }
        }
    };
}

/// Shared state handed to every tool invocation
#[derive(Clone)]
pub struct ToolContext {
    pub gitlab: Arc<GitLabClient>,
    pub read_only: bool,
    /// Correlates the log lines of one invocation
    pub request_id: String,
}

/// A piece of tool output content
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text(String),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text(text.into())
    }
}

/// Output of a tool execution
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl ToolOutput {
    /// A single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    /// A single pretty-printed JSON block, the shape used for
    /// single-resource responses
    pub fn json_value<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    /// A summary line followed by a pretty-printed JSON block, the
    /// envelope used for list responses
    pub fn with_summary<T: Serialize>(
        summary: impl Into<String>,
        value: &T,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            content: vec![
                ContentBlock::text(summary),
                ContentBlock::text(serde_json::to_string_pretty(value)?),
            ],
            is_error: false,
        })
    }

    /// An error carried in-band as tool output
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
        }
    }
}

/// The execution entry point implemented by every tool.
///
/// `validate` runs after deserialization and before `execute`; it must
/// not touch the network, so a validation failure is guaranteed to leave
/// GitLab untouched.
#[async_trait]
pub trait ToolExecutor {
    fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_value_is_pretty_printed() {
        let output = ToolOutput::json_value(&serde_json::json!({"a": 1})).unwrap();
        let ContentBlock::Text(text) = &output.content[0];
        assert!(text.contains("\n"));
        assert!(!output.is_error);
    }

    #[test]
    fn test_with_summary_has_two_blocks() {
        let output =
            ToolOutput::with_summary("Found 1 things", &serde_json::json!([{"a": 1}])).unwrap();
        assert_eq!(output.content.len(), 2);
        let ContentBlock::Text(summary) = &output.content[0];
        assert_eq!(summary, "Found 1 things");
    }

    #[test]
    fn test_error_output_flagged() {
        let output = ToolOutput::error("boom");
        assert!(output.is_error);
    }
}
