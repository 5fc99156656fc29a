//! Tools module
//!
//! Provides the framework for defining and executing GitLab MCP tools.

pub mod definitions;
pub mod executor;
pub mod registry;
pub mod validate;

pub use executor::{ContentBlock, OperationType, ToolContext, ToolExecutor, ToolInfo, ToolOutput};
pub use registry::{RegisteredTool, ToolRegistry};
