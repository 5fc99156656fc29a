//! Typed GitLab API operations
//!
//! One method per upstream operation, layered over the HTTP core in
//! [`client`](crate::gitlab::client). Query strings are built only from the
//! option fields that are set, in a fixed key order, and user-supplied path
//! identifiers are percent-encoded segment by segment before interpolation.

use crate::error::{GitLabError, GitLabResult};
use crate::gitlab::GitLabClient;
use crate::gitlab::types::*;
use crate::util::{QueryBuilder, encode_path};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tracing::debug;

/// Addressing for wiki operations: project wikis and group wikis share
/// one endpoint shape under different roots.
#[derive(Debug, Clone)]
pub enum WikiScope {
    Project(String),
    Group(String),
}

impl WikiScope {
    fn base(&self) -> String {
        match self {
            WikiScope::Project(id) => format!("/projects/{}/wikis", encode_path(id)),
            WikiScope::Group(id) => format!("/groups/{}/wikis", encode_path(id)),
        }
    }
}

/// Filters for listing projects within a group
#[derive(Debug, Default)]
pub struct ListGroupProjectsOptions {
    pub archived: Option<bool>,
    pub visibility: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub simple: Option<bool>,
    pub include_subgroups: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Filters for the project event feed
#[derive(Debug, Default)]
pub struct ProjectEventsOptions {
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Filters for listing repository commits
#[derive(Debug, Default)]
pub struct ListCommitsOptions {
    /// Branch, tag or commit to start from; sent upstream as `ref_name`
    pub sha: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub path: Option<String>,
    pub all: Option<bool>,
    pub with_stats: Option<bool>,
    pub first_parent: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Filters for listing project issues
#[derive(Debug, Default)]
pub struct ListIssuesOptions {
    /// Filtered client-side after fetching; never sent upstream
    pub iid: Option<String>,
    pub state: Option<String>,
    pub labels: Option<String>,
    pub milestone: Option<String>,
    pub scope: Option<String>,
    pub author_id: Option<u64>,
    pub assignee_id: Option<u64>,
    pub search: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Filters for listing project merge requests
#[derive(Debug, Default)]
pub struct ListMergeRequestsOptions {
    pub state: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub milestone: Option<String>,
    pub labels: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub scope: Option<String>,
    pub author_id: Option<u64>,
    pub assignee_id: Option<u64>,
    pub search: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub wip: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Fields for creating a new project
#[derive(Debug, Default)]
pub struct CreateRepositoryOptions {
    pub name: String,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub initialize_with_readme: Option<bool>,
}

/// Fields for opening a new issue
#[derive(Debug, Default)]
pub struct CreateIssueOptions {
    pub title: String,
    pub description: Option<String>,
    pub assignee_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    pub labels: Option<Vec<String>>,
}

/// Fields for opening a new merge request
#[derive(Debug, Default)]
pub struct CreateMergeRequestOptions {
    pub title: String,
    pub description: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    pub allow_collaboration: Option<bool>,
    pub draft: Option<bool>,
}

/// One file in a multi-file push
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

/// Pagination plus an optional name filter for member listings
#[derive(Debug, Default)]
pub struct ListMembersOptions {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Pagination and ordering for note and discussion listings
#[derive(Debug, Default)]
pub struct ListNotesOptions {
    pub sort: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl GitLabClient {
    /// Search projects visible to the token, with pagination.
    pub async fn search_projects(
        &self,
        search: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> GitLabResult<Paged<Project>> {
        let query = QueryBuilder::new()
            .param("search", search)
            .param("page", page.unwrap_or(1))
            .param("per_page", per_page.unwrap_or(20))
            .build();

        self.get_paged(&format!("/projects{query}")).await
    }

    /// Create a new project owned by the token's user. Unset optional
    /// fields are left out of the body rather than sent as null.
    pub async fn create_repository(
        &self,
        options: &CreateRepositoryOptions,
    ) -> GitLabResult<Project> {
        let mut body = json!({ "name": options.name });
        if let Some(description) = &options.description {
            body["description"] = json!(description);
        }
        if let Some(visibility) = &options.visibility {
            body["visibility"] = json!(visibility);
        }
        if let Some(readme) = options.initialize_with_readme {
            body["initialize_with_readme"] = json!(readme);
        }

        self.post("/projects", &body).await
    }

    /// Fork a project, optionally into a different namespace.
    pub async fn fork_project(
        &self,
        project_id: &str,
        namespace: Option<&str>,
    ) -> GitLabResult<Project> {
        let query = QueryBuilder::new().optional("namespace", namespace).build();
        let endpoint = format!("/projects/{}/fork{query}", encode_path(project_id));

        self.post(&endpoint, &json!({})).await
    }

    /// The default branch of a project, resolved from its metadata.
    pub async fn default_branch_ref(&self, project_id: &str) -> GitLabResult<String> {
        let project: Project = self
            .get(&format!("/projects/{}", encode_path(project_id)))
            .await?;

        project.default_branch.ok_or_else(|| {
            GitLabError::InvalidResponse(format!(
                "project '{project_id}' has no default branch"
            ))
        })
    }

    /// Create a branch. When `source_ref` is absent the project's default
    /// branch is resolved first, so an empty repository fails cleanly.
    pub async fn create_branch(
        &self,
        project_id: &str,
        name: &str,
        source_ref: Option<&str>,
    ) -> GitLabResult<Branch> {
        let source = match source_ref {
            Some(r) => r.to_string(),
            None => self.default_branch_ref(project_id).await?,
        };

        let endpoint = format!("/projects/{}/repository/branches", encode_path(project_id));
        self.post(&endpoint, &json!({ "branch": name, "ref": source }))
            .await
    }

    /// Fetch the contents at a repository path.
    ///
    /// A single file comes back with its base64 payload decoded to text;
    /// a directory listing passes through untouched.
    pub async fn get_file_contents(
        &self,
        project_id: &str,
        file_path: &str,
        git_ref: &str,
    ) -> GitLabResult<RepositoryContent> {
        let endpoint = format!(
            "/projects/{}/repository/files/{}{}",
            encode_path(project_id),
            urlencoding::encode(file_path),
            QueryBuilder::new().param("ref", git_ref).build(),
        );

        let mut content: RepositoryContent = self.get(&endpoint).await?;

        if let RepositoryContent::File(file) = &mut content {
            if file.encoding == "base64" {
                let raw = BASE64
                    .decode(file.content.trim_end())
                    .map_err(|e| GitLabError::InvalidResponse(format!("Invalid base64 file content: {e}")))?;
                file.content = String::from_utf8(raw).map_err(|e| {
                    GitLabError::InvalidResponse(format!("File content is not valid UTF-8: {e}"))
                })?;
            }
        }

        Ok(content)
    }

    /// Create or update a file with a single commit.
    ///
    /// Existence is probed with a read of the same path on the target
    /// branch: a successful probe selects update (PUT), any probe failure
    /// selects create (POST). A probe failure for reasons other than
    /// absence therefore surfaces as the create attempt's error.
    pub async fn create_or_update_file(
        &self,
        project_id: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
        branch: &str,
        previous_path: Option<&str>,
    ) -> GitLabResult<FileCommit> {
        let endpoint = format!(
            "/projects/{}/repository/files/{}",
            encode_path(project_id),
            urlencoding::encode(file_path),
        );

        let mut body = json!({
            "branch": branch,
            "content": content,
            "commit_message": commit_message,
        });
        if let Some(previous) = previous_path {
            body["previous_path"] = json!(previous);
        }

        let exists = self
            .get_file_contents(project_id, file_path, branch)
            .await
            .is_ok();
        debug!(file_path, exists, "create_or_update_file probe");

        let response: Value = if exists {
            self.put_json(&endpoint, &body).await?
        } else {
            self.post_json(&endpoint, &body).await?
        };

        // The files endpoint reports the commit inconsistently across
        // GitLab versions; fall back through the known field names.
        let commit_id = response["commit_id"]
            .as_str()
            .or_else(|| response["id"].as_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(FileCommit {
            file_path: file_path.to_string(),
            branch: branch.to_string(),
            commit_id,
            content: response["content"].as_str().map(str::to_string),
        })
    }

    /// List projects in a group.
    pub async fn list_group_projects(
        &self,
        group_id: &str,
        options: &ListGroupProjectsOptions,
    ) -> GitLabResult<Paged<Project>> {
        let query = QueryBuilder::new()
            .optional("archived", options.archived)
            .optional("visibility", options.visibility.as_deref())
            .optional("order_by", options.order_by.as_deref())
            .optional("sort", options.sort.as_deref())
            .optional("search", options.search.as_deref())
            .optional("simple", options.simple)
            .optional("include_subgroups", options.include_subgroups)
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build();

        self.get_paged(&format!("/groups/{}/projects{query}", encode_path(group_id)))
            .await
    }

    /// Fetch the activity event feed of a project.
    pub async fn get_project_events(
        &self,
        project_id: &str,
        options: &ProjectEventsOptions,
    ) -> GitLabResult<Paged<Event>> {
        let query = QueryBuilder::new()
            .optional("action", options.action.as_deref())
            .optional("target_type", options.target_type.as_deref())
            .optional("before", options.before.as_deref())
            .optional("after", options.after.as_deref())
            .optional("sort", options.sort.as_deref())
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build();

        self.get_paged(&format!("/projects/{}/events{query}", encode_path(project_id)))
            .await
    }

    /// List repository commits.
    ///
    /// The caller-facing `sha` filter is translated to the `ref_name`
    /// query key the commits endpoint actually accepts.
    pub async fn list_commits(
        &self,
        project_id: &str,
        options: &ListCommitsOptions,
    ) -> GitLabResult<Paged<Commit>> {
        let query = QueryBuilder::new()
            .optional("ref_name", options.sha.as_deref())
            .optional("since", options.since.as_deref())
            .optional("until", options.until.as_deref())
            .optional("path", options.path.as_deref())
            .optional("all", options.all)
            .optional("with_stats", options.with_stats)
            .optional("first_parent", options.first_parent)
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build();

        self.get_paged(&format!(
            "/projects/{}/repository/commits{query}",
            encode_path(project_id)
        ))
        .await
    }

    /// List project issues.
    ///
    /// The issues endpoint has no `iid` filter, so when one is given the
    /// full page is fetched and filtered here; `count` then reflects the
    /// filtered length instead of the `X-Total` header.
    pub async fn list_issues(
        &self,
        project_id: &str,
        options: &ListIssuesOptions,
    ) -> GitLabResult<Paged<Issue>> {
        let query = QueryBuilder::new()
            .optional("state", options.state.as_deref())
            .optional("labels", options.labels.as_deref())
            .optional("milestone", options.milestone.as_deref())
            .optional("scope", options.scope.as_deref())
            .optional("author_id", options.author_id)
            .optional("assignee_id", options.assignee_id)
            .optional("search", options.search.as_deref())
            .optional("created_after", options.created_after.as_deref())
            .optional("created_before", options.created_before.as_deref())
            .optional("updated_after", options.updated_after.as_deref())
            .optional("updated_before", options.updated_before.as_deref())
            .optional("order_by", options.order_by.as_deref())
            .optional("sort", options.sort.as_deref())
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build();

        let mut paged: Paged<Issue> = self
            .get_paged(&format!("/projects/{}/issues{query}", encode_path(project_id)))
            .await?;

        if let Some(iid) = &options.iid {
            paged.items.retain(|issue| issue.iid.to_string() == *iid);
            paged.count = paged.items.len() as u64;
        }

        Ok(paged)
    }

    /// List project merge requests.
    pub async fn list_merge_requests(
        &self,
        project_id: &str,
        options: &ListMergeRequestsOptions,
    ) -> GitLabResult<Paged<MergeRequest>> {
        let query = QueryBuilder::new()
            .optional("state", options.state.as_deref())
            .optional("order_by", options.order_by.as_deref())
            .optional("sort", options.sort.as_deref())
            .optional("milestone", options.milestone.as_deref())
            .optional("labels", options.labels.as_deref())
            .optional("created_after", options.created_after.as_deref())
            .optional("created_before", options.created_before.as_deref())
            .optional("updated_after", options.updated_after.as_deref())
            .optional("updated_before", options.updated_before.as_deref())
            .optional("scope", options.scope.as_deref())
            .optional("author_id", options.author_id)
            .optional("assignee_id", options.assignee_id)
            .optional("search", options.search.as_deref())
            .optional("source_branch", options.source_branch.as_deref())
            .optional("target_branch", options.target_branch.as_deref())
            .optional("wip", options.wip.as_deref())
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build();

        self.get_paged(&format!(
            "/projects/{}/merge_requests{query}",
            encode_path(project_id)
        ))
        .await
    }

    /// Open a new issue. Labels are joined into the comma-separated
    /// form the API expects.
    pub async fn create_issue(
        &self,
        project_id: &str,
        options: &CreateIssueOptions,
    ) -> GitLabResult<Issue> {
        let mut body = json!({ "title": options.title });
        if let Some(description) = &options.description {
            body["description"] = json!(description);
        }
        if let Some(assignee_ids) = &options.assignee_ids {
            body["assignee_ids"] = json!(assignee_ids);
        }
        if let Some(milestone_id) = options.milestone_id {
            body["milestone_id"] = json!(milestone_id);
        }
        if let Some(labels) = &options.labels {
            body["labels"] = json!(labels.join(","));
        }

        self.post(&format!("/projects/{}/issues", encode_path(project_id)), &body)
            .await
    }

    /// Open a new merge request.
    ///
    /// The response is rebuilt field by field with explicit defaults for
    /// the pieces the API omits right after creation (`description`,
    /// `assignees`, `diff_refs`), so callers always see a full record.
    pub async fn create_merge_request(
        &self,
        project_id: &str,
        options: &CreateMergeRequestOptions,
    ) -> GitLabResult<MergeRequest> {
        let mut body = json!({
            "title": options.title,
            "source_branch": options.source_branch,
            "target_branch": options.target_branch,
        });
        if let Some(description) = &options.description {
            body["description"] = json!(description);
        }
        if let Some(allow_collaboration) = options.allow_collaboration {
            body["allow_collaboration"] = json!(allow_collaboration);
        }
        if let Some(draft) = options.draft {
            body["draft"] = json!(draft);
        }

        self.post(
            &format!("/projects/{}/merge_requests", encode_path(project_id)),
            &body,
        )
        .await
    }

    /// List wiki pages of a project or group.
    pub async fn list_wiki_pages(
        &self,
        scope: &WikiScope,
        with_content: Option<bool>,
    ) -> GitLabResult<Paged<WikiPage>> {
        let query = QueryBuilder::new()
            .optional("with_content", with_content.map(|b| b as u8))
            .build();

        self.get_paged(&format!("{}{query}", scope.base())).await
    }

    /// Fetch a single wiki page by slug, content included.
    pub async fn get_wiki_page(&self, scope: &WikiScope, slug: &str) -> GitLabResult<WikiPage> {
        self.get(&format!("{}/{}", scope.base(), urlencoding::encode(slug)))
            .await
    }

    /// Create a wiki page. The format defaults to markdown upstream, so
    /// it is only sent when the caller chose one.
    pub async fn create_wiki_page(
        &self,
        scope: &WikiScope,
        title: &str,
        content: &str,
        format: Option<WikiFormat>,
    ) -> GitLabResult<WikiPage> {
        let mut body = json!({ "title": title, "content": content });
        if let Some(format) = format {
            body["format"] = json!(format);
        }

        self.post(&scope.base(), &body).await
    }

    /// Update a wiki page. Only the provided fields are sent, so the
    /// others keep their current value.
    pub async fn update_wiki_page(
        &self,
        scope: &WikiScope,
        slug: &str,
        title: Option<&str>,
        content: Option<&str>,
        format: Option<WikiFormat>,
    ) -> GitLabResult<WikiPage> {
        let mut body = json!({});
        if let Some(title) = title {
            body["title"] = json!(title);
        }
        if let Some(content) = content {
            body["content"] = json!(content);
        }
        if let Some(format) = format {
            body["format"] = json!(format);
        }

        self.put(
            &format!("{}/{}", scope.base(), urlencoding::encode(slug)),
            &body,
        )
        .await
    }

    /// Delete a wiki page by slug.
    pub async fn delete_wiki_page(&self, scope: &WikiScope, slug: &str) -> GitLabResult<()> {
        self.delete(&format!("{}/{}", scope.base(), urlencoding::encode(slug)))
            .await
    }

    /// Upload an attachment to a project wiki.
    ///
    /// `content` is base64; it is wrapped into a data URI unless the
    /// caller already supplied one. The attachment's file name is the
    /// final segment of `file_path`.
    pub async fn upload_wiki_attachment(
        &self,
        project_id: &str,
        file_path: &str,
        content: &str,
        branch: Option<&str>,
    ) -> GitLabResult<WikiAttachment> {
        let data_uri = if content.starts_with("data:") {
            content.to_string()
        } else {
            format!("data:application/octet-stream;base64,{content}")
        };

        let file_name = file_path.rsplit('/').next().unwrap_or(file_path);

        let mut body = json!({
            "file_name": file_name,
            "content": data_uri,
        });
        if let Some(branch) = branch {
            body["branch"] = json!(branch);
        }

        let endpoint = format!("/projects/{}/wikis/attachments", encode_path(project_id));
        let response: Value = self.post(&endpoint, &body).await?;

        Ok(WikiAttachment {
            file_name: file_name.to_string(),
            file_path: response["file_path"]
                .as_str()
                .unwrap_or(file_path)
                .to_string(),
            branch: response["branch"]
                .as_str()
                .or(branch)
                .unwrap_or("main")
                .to_string(),
            commit_id: response["commit_id"].as_str().map(str::to_string),
            url: response["link"]["url"]
                .as_str()
                .or_else(|| response["url"].as_str())
                .map(str::to_string),
        })
    }

    /// List members of a project.
    pub async fn list_project_members(
        &self,
        project_id: &str,
        options: &ListMembersOptions,
    ) -> GitLabResult<Paged<Member>> {
        let query = Self::members_query(options);
        self.get_paged(&format!("/projects/{}/members{query}", encode_path(project_id)))
            .await
    }

    /// List members of a group.
    pub async fn list_group_members(
        &self,
        group_id: &str,
        options: &ListMembersOptions,
    ) -> GitLabResult<Paged<Member>> {
        let query = Self::members_query(options);
        self.get_paged(&format!("/groups/{}/members{query}", encode_path(group_id)))
            .await
    }

    fn members_query(options: &ListMembersOptions) -> String {
        QueryBuilder::new()
            .optional("query", options.query.as_deref())
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build()
    }

    /// List the notes of an issue, newest ordering left to the caller.
    pub async fn list_issue_notes(
        &self,
        project_id: &str,
        issue_iid: u64,
        options: &ListNotesOptions,
    ) -> GitLabResult<Paged<Note>> {
        let query = Self::notes_query(options);
        let endpoint = format!(
            "/projects/{}/issues/{issue_iid}/notes{query}",
            encode_path(project_id)
        );

        self.get_paged(&endpoint)
            .await
            .map_err(|e| enrich_issue_error(e, project_id, issue_iid, "notes"))
    }

    /// List the discussion threads of an issue.
    pub async fn list_issue_discussions(
        &self,
        project_id: &str,
        issue_iid: u64,
        options: &ListNotesOptions,
    ) -> GitLabResult<Paged<Discussion>> {
        let query = Self::notes_query(options);
        let endpoint = format!(
            "/projects/{}/issues/{issue_iid}/discussions{query}",
            encode_path(project_id)
        );

        self.get_paged(&endpoint)
            .await
            .map_err(|e| enrich_issue_error(e, project_id, issue_iid, "discussions"))
    }

    fn notes_query(options: &ListNotesOptions) -> String {
        QueryBuilder::new()
            .optional("sort", options.sort.as_deref())
            .optional("order_by", options.order_by.as_deref())
            .optional("page", options.page)
            .optional("per_page", options.per_page)
            .build()
    }
}

/// Reword the generic status errors for issue sub-resources so the
/// message names the issue instead of "requested resource".
fn enrich_issue_error(
    error: GitLabError,
    project_id: &str,
    issue_iid: u64,
    what: &str,
) -> GitLabError {
    match error {
        GitLabError::NotFound { .. } => GitLabError::NotFound {
            resource: format!("issue #{issue_iid} in project '{project_id}'"),
        },
        GitLabError::Forbidden { .. } => GitLabError::Forbidden {
            action: format!("reading {what} of issue #{issue_iid} in project '{project_id}'"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiki_scope_base_paths() {
        let project = WikiScope::Project("group/app".into());
        assert_eq!(project.base(), "/projects/group%2Fapp/wikis");

        let group = WikiScope::Group("42".into());
        assert_eq!(group.base(), "/groups/42/wikis");
    }

    #[test]
    fn test_enrich_issue_error_rewords_not_found() {
        let enriched = enrich_issue_error(
            GitLabError::NotFound {
                resource: "requested resource".into(),
            },
            "group/app",
            7,
            "notes",
        );
        assert!(enriched.to_string().contains("issue #7 in project 'group/app'"));
    }

    #[test]
    fn test_enrich_issue_error_keeps_rate_limit() {
        let enriched = enrich_issue_error(
            GitLabError::RateLimited { retry_after: 30 },
            "group/app",
            7,
            "notes",
        );
        assert!(matches!(enriched, GitLabError::RateLimited { retry_after: 30 }));
    }
}
