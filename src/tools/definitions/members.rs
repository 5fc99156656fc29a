//! Membership tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::ListMembersOptions;
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all membership tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListProjectMembers>();
    registry.register::<ListGroupMembers>();
}

// ============================================================================
// list_project_members
// ============================================================================

/// List direct members of a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProjectMembers {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Filter members by name or username
    #[serde(default)]
    pub query: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListProjectMembers,
    "list_project_members",
    "List members of a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for ListProjectMembers {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListMembersOptions {
            query: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let members = ctx
            .gitlab
            .list_project_members(&self.project_id, &options)
            .await?;

        format::members_response(&members)
    }
}

// ============================================================================
// list_group_members
// ============================================================================

/// List direct members of a group
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListGroupMembers {
    /// Group ID or URL-encoded path of the group
    pub group_id: String,

    /// Filter members by name or username
    #[serde(default)]
    pub query: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListGroupMembers,
    "list_group_members",
    "List members of a GitLab group",
    Read
);

#[async_trait]
impl ToolExecutor for ListGroupMembers {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListMembersOptions {
            query: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let members = ctx
            .gitlab
            .list_group_members(&self.group_id, &options)
            .await?;

        format::members_response(&members)
    }
}
