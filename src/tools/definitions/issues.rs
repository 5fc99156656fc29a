//! Issue tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::{CreateIssueOptions, ListIssuesOptions};
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page, check_timestamp};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;

/// Register all issue tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListIssues>();
    registry.register::<CreateIssue>();
}

/// Issue internal ID, accepted as either a number or a string
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum IssueIid {
    Number(u64),
    Text(String),
}

impl fmt::Display for IssueIid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueIid::Number(n) => write!(f, "{n}"),
            IssueIid::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// list_issues
// ============================================================================

/// List project issues with optional filtering
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssues {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Return the issue with the specified internal ID
    #[serde(default)]
    pub iid: Option<IssueIid>,

    /// Return issues with specified state: opened, closed or all
    #[serde(default)]
    pub state: Option<String>,

    /// Return issues matching a comma-separated list of labels
    #[serde(default)]
    pub labels: Option<String>,

    /// Return issues for a specific milestone
    #[serde(default)]
    pub milestone: Option<String>,

    /// Return issues for the given scope: created_by_me, assigned_to_me or all
    #[serde(default)]
    pub scope: Option<String>,

    /// Return issues created by the given user id
    #[serde(default)]
    pub author_id: Option<u64>,

    /// Return issues assigned to the given user id
    #[serde(default)]
    pub assignee_id: Option<u64>,

    /// Search issues against their title and description
    #[serde(default)]
    pub search: Option<String>,

    /// Return issues created after the specified date
    #[serde(default)]
    pub created_after: Option<String>,

    /// Return issues created before the specified date
    #[serde(default)]
    pub created_before: Option<String>,

    /// Return issues updated after the specified date
    #[serde(default)]
    pub updated_after: Option<String>,

    /// Return issues updated before the specified date
    #[serde(default)]
    pub updated_before: Option<String>,

    /// Return issues ordered by specified field
    #[serde(default)]
    pub order_by: Option<String>,

    /// Return issues sorted in ascending or descending order
    #[serde(default)]
    pub sort: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListIssues,
    "list_issues",
    "Get issues for a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for ListIssues {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)?;
        check_timestamp("created_after", self.created_after.as_deref())?;
        check_timestamp("created_before", self.created_before.as_deref())?;
        check_timestamp("updated_after", self.updated_after.as_deref())?;
        check_timestamp("updated_before", self.updated_before.as_deref())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListIssuesOptions {
            iid: self.iid.as_ref().map(|iid| iid.to_string()),
            state: self.state.clone(),
            labels: self.labels.clone(),
            milestone: self.milestone.clone(),
            scope: self.scope.clone(),
            author_id: self.author_id,
            assignee_id: self.assignee_id,
            search: self.search.clone(),
            created_after: self.created_after.clone(),
            created_before: self.created_before.clone(),
            updated_after: self.updated_after.clone(),
            updated_before: self.updated_before.clone(),
            order_by: self.order_by.clone(),
            sort: self.sort.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let issues = ctx.gitlab.list_issues(&self.project_id, &options).await?;
        format::issues_response(&issues)
    }
}

// ============================================================================
// create_issue
// ============================================================================

/// Open a new issue in a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssue {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Issue title
    pub title: String,

    /// Issue description
    #[serde(default)]
    pub description: Option<String>,

    /// Array of user IDs to assign
    #[serde(default)]
    pub assignee_ids: Option<Vec<u64>>,

    /// Array of label names
    #[serde(default)]
    pub labels: Option<Vec<String>>,

    /// Milestone ID to assign
    #[serde(default)]
    pub milestone_id: Option<u64>,
}

tool_info!(
    CreateIssue,
    "create_issue",
    "Create a new issue in a GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for CreateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateIssueOptions {
            title: self.title.clone(),
            description: self.description.clone(),
            assignee_ids: self.assignee_ids.clone(),
            milestone_id: self.milestone_id,
            labels: self.labels.clone(),
        };

        let issue = ctx.gitlab.create_issue(&self.project_id, &options).await?;
        ToolOutput::json_value(&issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iid_accepts_number_and_string() {
        let n: IssueIid = serde_json::from_str("42").unwrap();
        assert_eq!(n.to_string(), "42");

        let s: IssueIid = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(s.to_string(), "42");
    }
}
