//! Project-level tools
//!
//! Searching, creating and forking projects, plus group project listings.

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::{CreateRepositoryOptions, ListGroupProjectsOptions};
use crate::tool_info;
use crate::tools::validate::{check_page, check_per_page};
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all project tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<SearchRepositories>();
    registry.register::<CreateRepository>();
    registry.register::<ForkRepository>();
    registry.register::<ListGroupProjects>();
}

// ============================================================================
// search_repositories
// ============================================================================

/// Search for projects visible to the token
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchRepositories {
    /// Search query
    pub search: String,

    /// Page number for pagination (default: 1)
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page (default: 20)
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    SearchRepositories,
    "search_repositories",
    "Search for GitLab projects",
    Read
);

#[async_trait]
impl ToolExecutor for SearchRepositories {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let results = ctx
            .gitlab
            .search_projects(&self.search, self.page, self.per_page)
            .await?;

        format::projects_response(&results)
    }
}

// ============================================================================
// create_repository
// ============================================================================

/// Create a new project owned by the token's user
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateRepository {
    /// Repository name
    pub name: String,

    /// Repository description
    #[serde(default)]
    pub description: Option<String>,

    /// Repository visibility level: private, internal or public
    #[serde(default)]
    pub visibility: Option<String>,

    /// Initialize with README.md
    #[serde(default)]
    pub initialize_with_readme: Option<bool>,
}

tool_info!(
    CreateRepository,
    "create_repository",
    "Create a new GitLab project",
    Write
);

#[async_trait]
impl ToolExecutor for CreateRepository {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = CreateRepositoryOptions {
            name: self.name.clone(),
            description: self.description.clone(),
            visibility: self.visibility.clone(),
            initialize_with_readme: self.initialize_with_readme,
        };

        let repository = ctx.gitlab.create_repository(&options).await?;
        ToolOutput::json_value(&repository)
    }
}

// ============================================================================
// fork_repository
// ============================================================================

/// Fork a project to the caller's account or a chosen namespace
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ForkRepository {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Namespace to fork to (full path)
    #[serde(default)]
    pub namespace: Option<String>,
}

tool_info!(
    ForkRepository,
    "fork_repository",
    "Fork a GitLab project to your account or specified namespace",
    Write
);

#[async_trait]
impl ToolExecutor for ForkRepository {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let fork = ctx
            .gitlab
            .fork_project(&self.project_id, self.namespace.as_deref())
            .await?;

        ToolOutput::json_value(&fork)
    }
}

// ============================================================================
// list_group_projects
// ============================================================================

/// List all projects within a group
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListGroupProjects {
    /// Group ID or URL-encoded path of the group
    pub group_id: String,

    /// Limit by archived status
    #[serde(default)]
    pub archived: Option<bool>,

    /// Limit by visibility: public, internal or private
    #[serde(default)]
    pub visibility: Option<String>,

    /// Return projects ordered by the specified field
    #[serde(default)]
    pub order_by: Option<String>,

    /// Sort order: asc or desc
    #[serde(default)]
    pub sort: Option<String>,

    /// Return projects matching the search criteria
    #[serde(default)]
    pub search: Option<String>,

    /// Return only limited fields for each project
    #[serde(default)]
    pub simple: Option<bool>,

    /// Include projects in subgroups of this group
    #[serde(default)]
    pub include_subgroups: Option<bool>,

    /// Page number for pagination
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of results per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

tool_info!(
    ListGroupProjects,
    "list_group_projects",
    "List all projects (repositories) within a specific GitLab group",
    Read
);

#[async_trait]
impl ToolExecutor for ListGroupProjects {
    fn validate(&self) -> Result<(), ToolError> {
        check_per_page("per_page", self.per_page)?;
        check_page("page", self.page)
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let options = ListGroupProjectsOptions {
            archived: self.archived,
            visibility: self.visibility.clone(),
            order_by: self.order_by.clone(),
            sort: self.sort.clone(),
            search: self.search.clone(),
            simple: self.simple,
            include_subgroups: self.include_subgroups,
            page: self.page,
            per_page: self.per_page,
        };

        let results = ctx
            .gitlab
            .list_group_projects(&self.group_id, &options)
            .await?;

        format::projects_response(&results)
    }
}
