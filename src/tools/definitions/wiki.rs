//! Wiki tools
//!
//! Project and group wikis share one endpoint shape, so each tool here
//! takes exactly one of `project_id` / `group_id` and resolves it into a
//! [`WikiScope`]. The attachment upload is project-only.

use crate::error::ToolError;
use crate::format;
use crate::gitlab::api::WikiScope;
use crate::gitlab::types::WikiFormat;
use crate::tool_info;
use crate::tools::{ToolContext, ToolExecutor, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all wiki tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListWikiPages>();
    registry.register::<GetWikiPage>();
    registry.register::<CreateWikiPage>();
    registry.register::<UpdateWikiPage>();
    registry.register::<DeleteWikiPage>();
    registry.register::<UploadWikiAttachment>();
}

/// Resolve the wiki addressing arguments into a scope, rejecting
/// ambiguous or empty addressing before any request is made.
fn wiki_scope(
    project_id: Option<&String>,
    group_id: Option<&String>,
) -> Result<WikiScope, ToolError> {
    match (project_id, group_id) {
        (Some(p), None) => Ok(WikiScope::Project(p.clone())),
        (None, Some(g)) => Ok(WikiScope::Group(g.clone())),
        (Some(_), Some(_)) => Err(ToolError::InvalidArguments(
            "provide either project_id or group_id, not both".into(),
        )),
        (None, None) => Err(ToolError::InvalidArguments(
            "one of project_id or group_id is required".into(),
        )),
    }
}

// ============================================================================
// list_wiki_pages
// ============================================================================

/// List wiki pages of a project or group
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListWikiPages {
    /// Project ID or URL-encoded path (for a project wiki)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Group ID or URL-encoded path (for a group wiki)
    #[serde(default)]
    pub group_id: Option<String>,

    /// Include page content in the listing
    #[serde(default)]
    pub with_content: Option<bool>,
}

tool_info!(
    ListWikiPages,
    "list_wiki_pages",
    "List wiki pages of a GitLab project or group",
    Read
);

#[async_trait]
impl ToolExecutor for ListWikiPages {
    fn validate(&self) -> Result<(), ToolError> {
        wiki_scope(self.project_id.as_ref(), self.group_id.as_ref()).map(|_| ())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let scope = wiki_scope(self.project_id.as_ref(), self.group_id.as_ref())?;
        let pages = ctx.gitlab.list_wiki_pages(&scope, self.with_content).await?;
        format::wiki_pages_response(&pages)
    }
}

// ============================================================================
// get_wiki_page
// ============================================================================

/// Fetch a single wiki page with its full content
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWikiPage {
    /// Project ID or URL-encoded path (for a project wiki)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Group ID or URL-encoded path (for a group wiki)
    #[serde(default)]
    pub group_id: Option<String>,

    /// URL-encoded slug of the wiki page
    pub slug: String,
}

tool_info!(
    GetWikiPage,
    "get_wiki_page",
    "Get a wiki page of a GitLab project or group",
    Read
);

#[async_trait]
impl ToolExecutor for GetWikiPage {
    fn validate(&self) -> Result<(), ToolError> {
        wiki_scope(self.project_id.as_ref(), self.group_id.as_ref()).map(|_| ())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let scope = wiki_scope(self.project_id.as_ref(), self.group_id.as_ref())?;
        let page = ctx.gitlab.get_wiki_page(&scope, &self.slug).await?;
        // Single-item context keeps the full content
        ToolOutput::json_value(&page)
    }
}

// ============================================================================
// create_wiki_page
// ============================================================================

/// Create a wiki page
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateWikiPage {
    /// Project ID or URL-encoded path (for a project wiki)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Group ID or URL-encoded path (for a group wiki)
    #[serde(default)]
    pub group_id: Option<String>,

    /// Title of the wiki page
    pub title: String,

    /// Content of the wiki page
    pub content: String,

    /// Markup format: markdown, rdoc, asciidoc or org (default: markdown)
    #[serde(default)]
    pub format: Option<WikiFormat>,
}

tool_info!(
    CreateWikiPage,
    "create_wiki_page",
    "Create a new wiki page in a GitLab project or group",
    Write
);

#[async_trait]
impl ToolExecutor for CreateWikiPage {
    fn validate(&self) -> Result<(), ToolError> {
        wiki_scope(self.project_id.as_ref(), self.group_id.as_ref()).map(|_| ())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let scope = wiki_scope(self.project_id.as_ref(), self.group_id.as_ref())?;
        let page = ctx
            .gitlab
            .create_wiki_page(&scope, &self.title, &self.content, self.format)
            .await?;

        ToolOutput::json_value(&page)
    }
}

// ============================================================================
// update_wiki_page
// ============================================================================

/// Update the title, content or format of a wiki page
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateWikiPage {
    /// Project ID or URL-encoded path (for a project wiki)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Group ID or URL-encoded path (for a group wiki)
    #[serde(default)]
    pub group_id: Option<String>,

    /// URL-encoded slug of the wiki page
    pub slug: String,

    /// New title of the wiki page
    #[serde(default)]
    pub title: Option<String>,

    /// New content of the wiki page
    #[serde(default)]
    pub content: Option<String>,

    /// Markup format: markdown, rdoc, asciidoc or org
    #[serde(default)]
    pub format: Option<WikiFormat>,
}

tool_info!(
    UpdateWikiPage,
    "update_wiki_page",
    "Update an existing wiki page in a GitLab project or group",
    Write
);

#[async_trait]
impl ToolExecutor for UpdateWikiPage {
    fn validate(&self) -> Result<(), ToolError> {
        wiki_scope(self.project_id.as_ref(), self.group_id.as_ref()).map(|_| ())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let scope = wiki_scope(self.project_id.as_ref(), self.group_id.as_ref())?;
        let page = ctx
            .gitlab
            .update_wiki_page(
                &scope,
                &self.slug,
                self.title.as_deref(),
                self.content.as_deref(),
                self.format,
            )
            .await?;

        ToolOutput::json_value(&page)
    }
}

// ============================================================================
// delete_wiki_page
// ============================================================================

/// Delete a wiki page by slug
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteWikiPage {
    /// Project ID or URL-encoded path (for a project wiki)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Group ID or URL-encoded path (for a group wiki)
    #[serde(default)]
    pub group_id: Option<String>,

    /// URL-encoded slug of the wiki page
    pub slug: String,
}

tool_info!(
    DeleteWikiPage,
    "delete_wiki_page",
    "Delete a wiki page from a GitLab project or group",
    Write
);

#[async_trait]
impl ToolExecutor for DeleteWikiPage {
    fn validate(&self) -> Result<(), ToolError> {
        wiki_scope(self.project_id.as_ref(), self.group_id.as_ref()).map(|_| ())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let scope = wiki_scope(self.project_id.as_ref(), self.group_id.as_ref())?;
        ctx.gitlab.delete_wiki_page(&scope, &self.slug).await?;

        ToolOutput::json_value(&serde_json::json!({
            "status": "deleted",
            "slug": self.slug,
        }))
    }
}

// ============================================================================
// upload_wiki_attachment
// ============================================================================

/// Upload an attachment to a project wiki
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadWikiAttachment {
    /// Project ID or URL-encoded path
    pub project_id: String,

    /// Destination path of the attachment, e.g. "img/diagram.png"
    pub file_path: String,

    /// Base64-encoded file content (a full data URI is also accepted)
    pub content: String,

    /// Branch to commit the attachment to (defaults to the wiki's
    /// default branch)
    #[serde(default)]
    pub branch: Option<String>,
}

tool_info!(
    UploadWikiAttachment,
    "upload_wiki_attachment",
    "Upload a file attachment to a GitLab project wiki",
    Write
);

#[async_trait]
impl ToolExecutor for UploadWikiAttachment {
    fn validate(&self) -> Result<(), ToolError> {
        if self.file_path.is_empty() || self.file_path.ends_with('/') {
            return Err(ToolError::invalid_field(
                "file_path",
                "must name a file, not a directory",
            ));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let attachment = ctx
            .gitlab
            .upload_wiki_attachment(
                &self.project_id,
                &self.file_path,
                &self.content,
                self.branch.as_deref(),
            )
            .await?;

        ToolOutput::json_value(&attachment)
    }
}
