//! Project event tools

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::ProjectEventsOptions;
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all event tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetProjectEvents>();
}

/// Fetch recent activity events of a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetProjectEvents {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Include only events of a particular action type
    #[serde(default)]
    pub action: Option<String>,

    /// Include only events of a particular target type
    #[serde(default)]
    pub target_type: Option<String>,

    /// Include only events created before a particular date
    #[serde(default)]
    pub before: Option<String>,

    /// Include only events created after a particular date
    #[serde(default)]
    pub after: Option<String>,

    /// Sort events in ascending or descending order (default: desc)
    #[serde(default)]
    pub sort: Option<String>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page (default: 20)
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    GetProjectEvents,
    "get_project_events",
    "Get recent events/activities for a GitLab project",
    Read
);

#[async_trait]
impl ToolExecutor for GetProjectEvents {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ProjectEventsOptions {
            action: self.action.clone(),
            target_type: self.target_type.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            sort: self.sort.clone(),
            page: self.page,
            per_page: self.per_page,
        };

        let events = ctx
            .gitlab
            .get_project_events(&self.project_id, &options)
            .await?;

        format::events_response(&events)
    }
}
