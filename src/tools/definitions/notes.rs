//! Issue note and discussion tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::ListNotesOptions;
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all note tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListIssueNotes>();
    registry.register::<ListIssueDiscussions>();
}

// ============================================================================
// list_issue_notes
// ============================================================================

/// List comments and system notes on an issue
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssueNotes {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Internal ID of the issue
    pub issue_iid: u64,

    /// Sort order: asc or desc
    #[serde(default)]
    pub sort: Option<String>,

    /// Order notes by created_at or updated_at
    #[serde(default)]
    pub order_by: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListIssueNotes,
    "list_issue_notes",
    "List notes (comments) on a GitLab issue",
    Read
);

#[async_trait]
impl ToolExecutor for ListIssueNotes {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListNotesOptions {
            sort: self.sort.clone(),
            order_by: self.order_by.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let notes = ctx
            .gitlab
            .list_issue_notes(&self.project_id, self.issue_iid, &options)
            .await?;

        format::notes_response(&notes)
    }
}

// ============================================================================
// list_issue_discussions
// ============================================================================

/// List discussion threads of an issue
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssueDiscussions {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Internal ID of the issue
    pub issue_iid: u64,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListIssueDiscussions,
    "list_issue_discussions",
    "List discussion threads on a GitLab issue",
    Read
);

#[async_trait]
impl ToolExecutor for ListIssueDiscussions {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListNotesOptions {
            sort: None,
            order_by: None,
            page: self.page,
            per_page: self.per_page,
        };

        let discussions = ctx
            .gitlab
            .list_issue_discussions(&self.project_id, self.issue_iid, &options)
            .await?;

        format::discussions_response(&discussions)
    }
}
