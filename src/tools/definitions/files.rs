//! Repository file tools
//!
//! Reading file or directory contents and committing file changes.

use crate::error::ToolError;
use crate::tool_info;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all file tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetFileContents>();
    registry.register::<CreateOrUpdateFile>();
    registry.register::<PushFiles>();
}

// ============================================================================
// get_file_contents
// ============================================================================

/// Fetch a file's decoded content, or a directory listing
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFileContents {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Path to the file or directory
    pub file_path: String,

    /// Branch/tag/commit to get contents from
    pub r#ref: String,
}

tool_info!(
    GetFileContents,
    "get_file_contents",
    "Get the contents of a file or directory from a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for GetFileContents {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let contents = ctx
            .gitlab
            .get_file_contents(&self.project_id, &self.file_path, &self.r#ref)
            .await?;

        ToolOutput::json_value(&contents)
    }
}

// ============================================================================
// create_or_update_file
// ============================================================================

/// Create or update a single file with one commit
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateOrUpdateFile {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Path where to create/update the file
    pub file_path: String,

    /// Content of the file
    pub content: String,

    /// Commit message
    pub commit_message: String,

    /// Branch to create/update the file in
    pub branch: String,

    /// Path of the file to move/rename
    #[serde(default)]
    pub previous_path: Option<String>,
}

tool_info!(
    CreateOrUpdateFile,
    "create_or_update_file",
    "Create or update a single file in a GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for CreateOrUpdateFile {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let result = ctx
            .gitlab
            .create_or_update_file(
                &self.project_id,
                &self.file_path,
                &self.content,
                &self.commit_message,
                &self.branch,
                self.previous_path.as_deref(),
            )
            .await?;

        ToolOutput::json_value(&result)
    }
}

// ============================================================================
// push_files
// ============================================================================

/// One file in a multi-file push
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PushFileEntry {
    /// Path where to create the file
    pub file_path: String,

    /// Content of the file
    pub content: String,
}

/// Push several files to a branch, one commit per file
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PushFiles {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Branch to push to
    pub branch: String,

    /// Array of files to push
    pub files: Vec<PushFileEntry>,

    /// Commit message
    pub commit_message: String,
}

tool_info!(
    PushFiles,
    "push_files",
    "Push multiple files to a GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for PushFiles {
    fn validate(&self) -> Result<(), ToolError> {
        if self.files.is_empty() {
            return Err(ToolError::invalid_field("files", "must not be empty"));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        // Files are applied in order and the push stops at the first
        // failure; commits already made stay in place, so the error must
        // name the file that broke the sequence.
        let mut results = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let result = ctx
                .gitlab
                .create_or_update_file(
                    &self.project_id,
                    &file.file_path,
                    &file.content,
                    &self.commit_message,
                    &self.branch,
                    None,
                )
                .await
                .map_err(|e| {
                    ToolError::ExecutionFailed(format!(
                        "failed to push '{}': {e}",
                        file.file_path
                    ))
                })?;
            results.push(result);
        }

        ToolOutput::json_value(&results)
    }
}
