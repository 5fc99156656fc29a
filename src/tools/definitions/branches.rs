//! Branch tools

use crate::error::ToolError;
use crate::tool_info;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all branch tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<CreateBranch>();
}

/// Create a branch, from an explicit ref or the default branch
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateBranch {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Name for the new branch
    pub branch: String,

    /// Source branch/commit for new branch (defaults to the project's
    /// default branch)
    #[serde(default)]
    pub r#ref: Option<String>,
}

tool_info!(
    CreateBranch,
    "create_branch",
    "Create a new branch in a GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for CreateBranch {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let branch = ctx
            .gitlab
            .create_branch(&self.project_id, &self.branch, self.r#ref.as_deref())
            .await?;

        ToolOutput::json_value(&branch)
    }
}
