//! Commit tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::ListCommitsOptions;
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page, check_timestamp};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all commit tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListCommits>();
}

/// List the commit history of a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCommits {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// The name of a repository branch or tag or commit SHA
    #[serde(default)]
    pub sha: Option<String>,

    /// Only commits after or on this date will be returned (ISO 8601 format)
    #[serde(default)]
    pub since: Option<String>,

    /// Only commits before or on this date will be returned (ISO 8601 format)
    #[serde(default)]
    pub until: Option<String>,

    /// The file path
    #[serde(default)]
    pub path: Option<String>,

    /// Retrieve every commit from the repository
    #[serde(default)]
    pub all: Option<bool>,

    /// Include commit stats
    #[serde(default)]
    pub with_stats: Option<bool>,

    /// Follow only the first parent commit upon seeing a merge commit
    #[serde(default)]
    pub first_parent: Option<bool>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page (default: 20, max: 100)
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListCommits,
    "list_commits",
    "Get commit history for a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for ListCommits {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)?;
        check_timestamp("since", self.since.as_deref())?;
        check_timestamp("until", self.until.as_deref())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListCommitsOptions {
            sha: self.sha.clone(),
            since: self.since.clone(),
            until: self.until.clone(),
            path: self.path.clone(),
            all: self.all,
            with_stats: self.with_stats,
            first_parent: self.first_parent,
            page: self.page,
            per_page: self.per_page,
        };

        let commits = ctx.gitlab.list_commits(&self.project_id, &options).await?;
        format::commits_response(&commits)
    }
}
