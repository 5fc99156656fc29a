//! Merge request tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::{CreateMergeRequestOptions, ListMergeRequestsOptions};
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page, check_timestamp};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all merge request tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListMergeRequests>();
    registry.register::<CreateMergeRequest>();
}

// ============================================================================
// list_merge_requests
// ============================================================================

/// List project merge requests with optional filtering
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMergeRequests {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Return merge requests with specified state: opened, closed,
    /// locked, merged or all
    #[serde(default)]
    pub state: Option<String>,

    /// Return merge requests ordered by created_at or updated_at
    #[serde(default)]
    pub order_by: Option<String>,

    /// Return merge requests sorted in ascending or descending order
    #[serde(default)]
    pub sort: Option<String>,

    /// Return merge requests for a specific milestone
    #[serde(default)]
    pub milestone: Option<String>,

    /// Return merge requests matching a comma-separated list of labels
    #[serde(default)]
    pub labels: Option<String>,

    /// Return merge requests created after the specified date
    #[serde(default)]
    pub created_after: Option<String>,

    /// Return merge requests created before the specified date
    #[serde(default)]
    pub created_before: Option<String>,

    /// Return merge requests updated after the specified date
    #[serde(default)]
    pub updated_after: Option<String>,

    /// Return merge requests updated before the specified date
    #[serde(default)]
    pub updated_before: Option<String>,

    /// Return merge requests for the given scope: created_by_me,
    /// assigned_to_me or all
    #[serde(default)]
    pub scope: Option<String>,

    /// Return merge requests created by the given user id
    #[serde(default)]
    pub author_id: Option<u64>,

    /// Return merge requests assigned to the given user id
    #[serde(default)]
    pub assignee_id: Option<u64>,

    /// Search merge requests against their title and description
    #[serde(default)]
    pub search: Option<String>,

    /// Return merge requests with the given source branch
    #[serde(default)]
    pub source_branch: Option<String>,

    /// Return merge requests with the given target branch
    #[serde(default)]
    pub target_branch: Option<String>,

    /// Filter merge requests against their wip status: yes or no
    #[serde(default)]
    pub wip: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListMergeRequests,
    "list_merge_requests",
    "Get merge requests for a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for ListMergeRequests {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)?;
        check_timestamp("created_after", self.created_after.as_deref())?;
        check_timestamp("created_before", self.created_before.as_deref())?;
        check_timestamp("updated_after", self.updated_after.as_deref())?;
        check_timestamp("updated_before", self.updated_before.as_deref())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListMergeRequestsOptions {
            state: self.state.clone(),
            order_by: self.order_by.clone(),
            sort: self.sort.clone(),
            milestone: self.milestone.clone(),
            labels: self.labels.clone(),
            created_after: self.created_after.clone(),
            created_before: self.created_before.clone(),
            updated_after: self.updated_after.clone(),
            updated_before: self.updated_before.clone(),
            scope: self.scope.clone(),
            author_id: self.author_id,
            assignee_id: self.assignee_id,
            search: self.search.clone(),
            source_branch: self.source_branch.clone(),
            target_branch: self.target_branch.clone(),
            wip: self.wip.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let mrs = ctx
            .gitlab
            .list_merge_requests(&self.project_id, &options)
            .await?;

        format::merge_requests_response(&mrs)
    }
}

// ============================================================================
// create_merge_request
// ============================================================================

/// Open a new merge request
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMergeRequest {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Merge request title
    pub title: String,

    /// Merge request description
    #[serde(default)]
    pub description: Option<String>,

    /// Branch containing changes
    pub source_branch: String,

    /// Branch to merge into
    pub target_branch: String,

    /// Create as draft merge request
    #[serde(default)]
    pub draft: Option<bool>,

    /// Allow commits from upstream members
    #[serde(default)]
    pub allow_collaboration: Option<bool>,
}

tool_info!(
    CreateMergeRequest,
    "create_merge_request",
    "Create a new merge request in a GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for CreateMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateMergeRequestOptions {
            title: self.title.clone(),
            description: self.description.clone(),
            source_branch: self.source_branch.clone(),
            target_branch: self.target_branch.clone(),
            allow_collaboration: self.allow_collaboration,
            draft: self.draft,
        };

        let mr = ctx
            .gitlab
            .create_merge_request(&self.project_id, &options)
            .await?;

        ToolOutput::json_value(&mr)
    }
}
