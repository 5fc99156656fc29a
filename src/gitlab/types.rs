//! GitLab API response types
//!
//! These are the output contracts for every upstream resource: raw JSON from
//! the API is decoded into these types, and a decode failure is reported as
//! [`GitLabError::SchemaMismatch`](crate::error::GitLabError) rather than a
//! user error. All values are transient, constructed fresh per call.

use serde::{Deserialize, Serialize};

/// GitLab user (author, assignee, event actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// GitLab project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    pub visibility: String,
    #[serde(default)]
    pub description: Option<String>,
    pub web_url: String,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub fork: Option<bool>,
    #[serde(default)]
    pub forked_from_project: Option<ForkParent>,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// The upstream project a fork was created from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkParent {
    pub name: String,
    pub path_with_namespace: String,
    pub web_url: String,
}

/// A branch reference as returned by the branches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: BranchCommit,
}

/// Commit summary embedded in a branch reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCommit {
    pub id: String,
    pub web_url: String,
}

/// Contents of a repository path: either a single file record or a
/// directory listing.
///
/// The wire format is untagged (object vs. array); the shape is
/// discriminated once at decode time so call sites can match on the
/// variant instead of re-inspecting JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepositoryContent {
    File(FileContent),
    Directory(Vec<TreeEntry>),
}

impl Serialize for RepositoryContent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Serialize back to the wire shape the upstream API uses
        match self {
            RepositoryContent::File(file) => file.serialize(serializer),
            RepositoryContent::Directory(entries) => entries.serialize(serializer),
        }
    }
}

/// A single file in a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub file_name: String,
    pub file_path: String,
    pub size: u64,
    pub encoding: String,
    /// Base64 on the wire; decoded to text by the client before returning
    pub content: String,
    #[serde(default)]
    pub content_sha256: Option<String>,
    #[serde(rename = "ref", default)]
    pub ref_name: Option<String>,
    pub blob_id: String,
    #[serde(default)]
    pub last_commit_id: Option<String>,
}

/// Entry in a directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    pub path: String,
    pub mode: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    Blob,
    Tree,
}

/// Result of a file create/update commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCommit {
    pub file_path: String,
    pub branch: String,
    pub commit_id: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// GitLab commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub author_name: String,
    pub author_email: String,
    pub authored_date: String,
    pub committer_name: String,
    pub committer_email: String,
    pub committed_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub web_url: String,
    /// First parent is the primary lineage
    #[serde(default)]
    pub parent_ids: Vec<String>,
    /// Only present when with_stats=true
    #[serde(default)]
    pub stats: Option<CommitStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// A label attached to an issue or merge request.
///
/// The upstream API returns labels either as plain name strings or as full
/// label objects, sometimes mixed within one array. `display_name` is the
/// single normalization point for human-facing projections; the raw variant
/// is preserved in full detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelRef {
    Name(String),
    Detailed(LabelDetail),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDetail {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LabelRef {
    /// The display name regardless of wire shape
    pub fn display_name(&self) -> &str {
        match self {
            LabelRef::Name(name) => name,
            LabelRef::Detailed(detail) => &detail.name,
        }
    }
}

/// GitLab milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    #[serde(default)]
    pub iid: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// GitLab issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    pub author: User,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    pub web_url: String,
}

/// GitLab merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    #[serde(default)]
    pub merged: Option<bool>,
    pub author: User,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    pub source_branch: String,
    pub target_branch: String,
    #[serde(default)]
    pub diff_refs: Option<DiffRefs>,
    pub web_url: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
}

/// Base/head/start SHA triple for a merge request diff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffRefs {
    pub base_sha: String,
    pub head_sha: String,
    pub start_sha: String,
}

/// A project activity event (append-only, immutable once returned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    pub action_name: String,
    #[serde(default)]
    pub target_id: Option<u64>,
    #[serde(default)]
    pub target_type: Option<String>,
    pub author: User,
    #[serde(default)]
    pub target_title: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub push_data: Option<PushData>,
    #[serde(default)]
    pub author_username: Option<String>,
}

/// Push details attached to push events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushData {
    #[serde(default)]
    pub commit_count: Option<u64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub ref_type: Option<String>,
    #[serde(default)]
    pub commit_from: Option<String>,
    #[serde(default)]
    pub commit_to: Option<String>,
    #[serde(rename = "ref", default)]
    pub ref_name: Option<String>,
    #[serde(default)]
    pub commit_title: Option<String>,
}

/// GitLab wiki page (project or group wiki)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiPage {
    pub slug: String,
    pub title: String,
    pub format: WikiFormat,
    /// Absent on list views unless with_content was requested
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WikiFormat {
    Markdown,
    Rdoc,
    Asciidoc,
    Org,
}

impl Default for WikiFormat {
    fn default() -> Self {
        WikiFormat::Markdown
    }
}

/// Result of a wiki attachment upload (created once, immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiAttachment {
    pub file_name: String,
    pub file_path: String,
    pub branch: String,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Project or group member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    pub access_level: u32,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A single comment or system annotation on an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
    pub author: User,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub resolvable: bool,
    #[serde(default)]
    pub resolved: bool,
}

/// An ordered group of notes sharing a thread id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: String,
    /// true for standalone comments, false for true threads
    pub individual_note: bool,
    pub notes: Vec<Note>,
}

/// Uniform envelope for every list-returning operation.
///
/// `count` is the server-side total from the `X-Total` header (0 when the
/// header is absent or non-numeric), not `items.len()` — except where a
/// client-side post-filter applies, in which case it equals the filtered
/// length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub count: u64,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_union_decodes_file() {
        let value = json!({
            "file_name": "README.md",
            "file_path": "README.md",
            "size": 24,
            "encoding": "base64",
            "content": "SGVsbG8=",
            "blob_id": "abc123",
            "ref": "main",
            "last_commit_id": "def456"
        });

        let content: RepositoryContent = serde_json::from_value(value).unwrap();
        match content {
            RepositoryContent::File(file) => {
                assert_eq!(file.file_name, "README.md");
                assert_eq!(file.ref_name.as_deref(), Some("main"));
            }
            RepositoryContent::Directory(_) => panic!("Expected file variant"),
        }
    }

    #[test]
    fn test_content_union_decodes_directory() {
        let value = json!([
            {"id": "a1", "name": "src", "type": "tree", "path": "src", "mode": "040000"},
            {"id": "b2", "name": "main.rs", "type": "blob", "path": "src/main.rs", "mode": "100644"}
        ]);

        let content: RepositoryContent = serde_json::from_value(value).unwrap();
        match content {
            RepositoryContent::Directory(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].entry_type, TreeEntryType::Tree);
                assert_eq!(entries[1].entry_type, TreeEntryType::Blob);
            }
            RepositoryContent::File(_) => panic!("Expected directory variant"),
        }
    }

    #[test]
    fn test_content_union_serializes_to_wire_shape() {
        let content = RepositoryContent::Directory(vec![TreeEntry {
            id: "a1".into(),
            name: "src".into(),
            entry_type: TreeEntryType::Tree,
            path: "src".into(),
            mode: "040000".into(),
            web_url: None,
        }]);

        let value = serde_json::to_value(&content).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_mixed_labels_decode_and_normalize() {
        let value = json!(["bug", {"id": 7, "name": "urgent", "color": "#ff0000"}]);
        let labels: Vec<LabelRef> = serde_json::from_value(value).unwrap();

        let names: Vec<&str> = labels.iter().map(LabelRef::display_name).collect();
        assert_eq!(names, vec!["bug", "urgent"]);

        // The raw shape round-trips untouched
        let raw = serde_json::to_value(&labels).unwrap();
        assert!(raw[0].is_string());
        assert!(raw[1].is_object());
    }

    #[test]
    fn test_wiki_format_decodes_lowercase() {
        let format: WikiFormat = serde_json::from_str(r#""asciidoc""#).unwrap();
        assert_eq!(format, WikiFormat::Asciidoc);
        assert_eq!(WikiFormat::default(), WikiFormat::Markdown);
    }

    #[test]
    fn test_commit_without_stats() {
        let value = json!({
            "id": "abc",
            "short_id": "abc",
            "title": "Fix",
            "author_name": "Alice",
            "author_email": "alice@example.com",
            "authored_date": "2024-01-01T00:00:00Z",
            "committer_name": "Alice",
            "committer_email": "alice@example.com",
            "committed_date": "2024-01-01T00:00:00Z",
            "web_url": "https://gitlab.com/x/y/-/commit/abc",
            "parent_ids": ["p1", "p2"]
        });

        let commit: Commit = serde_json::from_value(value).unwrap();
        assert!(commit.stats.is_none());
        assert_eq!(commit.parent_ids[0], "p1");
    }
}
