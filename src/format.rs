//! Response formatting
//!
//! Turns API results into the two-block envelope for list responses:
//! a `Found N <things>` summary line followed by a pretty-printed,
//! curated projection of the items. Projections drop the noisy parts of
//! the raw records and normalize label shapes to plain names; single-item
//! responses elsewhere keep the raw record untouched.

use crate::error::ToolResult;
use crate::gitlab::types::*;
use crate::tools::ToolOutput;
use serde_json::{Value, json};

/// Longest wiki content prefix shown in listing context
const WIKI_PREVIEW_CHARS: usize = 200;

fn found(count: u64, noun: &str) -> String {
    format!("Found {count} {noun}")
}

fn user_ref(user: &User) -> Value {
    json!({ "name": user.name, "username": user.username })
}

fn label_names(labels: &[LabelRef]) -> Vec<&str> {
    labels.iter().map(LabelRef::display_name).collect()
}

/// Projects from search or group listing
pub fn projects_response(projects: &Paged<Project>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = projects
        .items
        .iter()
        .map(|project| {
            json!({
                "id": project.id,
                "name": project.name,
                "path_with_namespace": project.path_with_namespace,
                "visibility": project.visibility,
                "description": project.description,
                "default_branch": project.default_branch,
                "created_at": project.created_at,
                "last_activity_at": project.last_activity_at,
                "web_url": project.web_url,
            })
        })
        .collect();

    ToolOutput::with_summary(found(projects.count, "projects"), &items)
}

/// Project activity events
pub fn events_response(events: &Paged<Event>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = events
        .items
        .iter()
        .map(|event| {
            json!({
                "id": event.id,
                "action": event.action_name,
                "author": event.author.name,
                "created_at": event.created_at,
                "target_type": event.target_type,
                "target_title": event.target_title,
                "push_data": event.push_data,
            })
        })
        .collect();

    ToolOutput::with_summary(found(events.count, "events"), &items)
}

/// Repository commits
pub fn commits_response(commits: &Paged<Commit>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = commits
        .items
        .iter()
        .map(|commit| {
            json!({
                "id": commit.id,
                "short_id": commit.short_id,
                "title": commit.title,
                "author_name": commit.author_name,
                "author_email": commit.author_email,
                "created_at": commit.created_at,
                "message": commit.message,
                "web_url": commit.web_url,
                "stats": commit.stats,
            })
        })
        .collect();

    ToolOutput::with_summary(found(commits.count, "commits"), &items)
}

/// Project issues
pub fn issues_response(issues: &Paged<Issue>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = issues
        .items
        .iter()
        .map(|issue| {
            json!({
                "id": issue.id,
                "iid": issue.iid,
                "title": issue.title,
                "description": issue.description,
                "state": issue.state,
                "created_at": issue.created_at,
                "updated_at": issue.updated_at,
                "closed_at": issue.closed_at,
                "labels": label_names(&issue.labels),
                "author": user_ref(&issue.author),
                "assignees": issue.assignees.iter().map(user_ref).collect::<Vec<_>>(),
                "web_url": issue.web_url,
            })
        })
        .collect();

    ToolOutput::with_summary(found(issues.count, "issues"), &items)
}

/// Project merge requests
pub fn merge_requests_response(mrs: &Paged<MergeRequest>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = mrs
        .items
        .iter()
        .map(|mr| {
            json!({
                "id": mr.id,
                "iid": mr.iid,
                "title": mr.title,
                "description": mr.description,
                "state": mr.state,
                "merged": mr.merged,
                "created_at": mr.created_at,
                "updated_at": mr.updated_at,
                "merged_at": mr.merged_at,
                "closed_at": mr.closed_at,
                "labels": label_names(&mr.labels),
                "source_branch": mr.source_branch,
                "target_branch": mr.target_branch,
                "author": user_ref(&mr.author),
                "assignees": mr.assignees.iter().map(user_ref).collect::<Vec<_>>(),
                "web_url": mr.web_url,
            })
        })
        .collect();

    ToolOutput::with_summary(found(mrs.count, "merge requests"), &items)
}

/// Wiki pages, with content cut to a short preview
pub fn wiki_pages_response(pages: &Paged<WikiPage>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = pages
        .items
        .iter()
        .map(|page| {
            json!({
                "slug": page.slug,
                "title": page.title,
                "format": page.format,
                "content": page.content.as_deref().map(truncate_preview),
            })
        })
        .collect();

    ToolOutput::with_summary(found(pages.count, "wiki pages"), &items)
}

/// Project or group members
pub fn members_response(members: &Paged<Member>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = members
        .items
        .iter()
        .map(|member| {
            json!({
                "id": member.id,
                "username": member.username,
                "name": member.name,
                "access_level": member.access_level,
                "expires_at": member.expires_at,
                "state": member.state,
            })
        })
        .collect();

    ToolOutput::with_summary(found(members.count, "members"), &items)
}

/// Issue notes
pub fn notes_response(notes: &Paged<Note>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = notes.items.iter().map(note_projection).collect();
    ToolOutput::with_summary(found(notes.count, "notes"), &items)
}

/// Issue discussion threads
pub fn discussions_response(discussions: &Paged<Discussion>) -> ToolResult<ToolOutput> {
    let items: Vec<Value> = discussions
        .items
        .iter()
        .map(|discussion| {
            json!({
                "id": discussion.id,
                "individual_note": discussion.individual_note,
                "notes": discussion.notes.iter().map(note_projection).collect::<Vec<_>>(),
            })
        })
        .collect();

    ToolOutput::with_summary(found(discussions.count, "discussions"), &items)
}

fn note_projection(note: &Note) -> Value {
    json!({
        "id": note.id,
        "body": note.body,
        "author": user_ref(&note.author),
        "created_at": note.created_at,
        "updated_at": note.updated_at,
        "system": note.system,
        "resolvable": note.resolvable,
        "resolved": note.resolved,
    })
}

/// Char-boundary-safe prefix with a trailing ellipsis when cut
fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= WIKI_PREVIEW_CHARS {
        content.to_string()
    } else {
        let prefix: String = content.chars().take(WIKI_PREVIEW_CHARS).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ContentBlock;
    use serde_json::json;

    fn text_blocks(output: &ToolOutput) -> Vec<&str> {
        output
            .content
            .iter()
            .map(|ContentBlock::Text(t)| t.as_str())
            .collect()
    }

    #[test]
    fn test_empty_list_still_produces_envelope() {
        let output = commits_response(&Paged { count: 0, items: vec![] }).unwrap();
        let blocks = text_blocks(&output);
        assert_eq!(blocks[0], "Found 0 commits");
        assert_eq!(blocks[1], "[]");
    }

    #[test]
    fn test_summary_uses_header_count_not_item_count() {
        let output = events_response(&Paged { count: 137, items: vec![] }).unwrap();
        assert_eq!(text_blocks(&output)[0], "Found 137 events");
    }

    #[test]
    fn test_issue_labels_normalized_to_names() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 1, "iid": 7, "project_id": 3, "title": "Bug",
            "state": "opened",
            "author": {"id": 1, "username": "alice", "name": "Alice"},
            "labels": ["bug", {"id": 2, "name": "urgent"}],
            "created_at": "2024-01-01T00:00:00Z",
            "web_url": "https://gitlab.com/x/y/-/issues/7"
        }))
        .unwrap();

        let output = issues_response(&Paged { count: 1, items: vec![issue] }).unwrap();
        let projection: Value = serde_json::from_str(text_blocks(&output)[1]).unwrap();
        assert_eq!(projection[0]["labels"], json!(["bug", "urgent"]));
        assert_eq!(projection[0]["author"], json!({"name": "Alice", "username": "alice"}));
    }

    #[test]
    fn test_wiki_preview_truncated_with_ellipsis() {
        let page = WikiPage {
            slug: "home".into(),
            title: "Home".into(),
            format: WikiFormat::Markdown,
            content: Some("x".repeat(500)),
            encoding: None,
        };

        let output = wiki_pages_response(&Paged { count: 1, items: vec![page] }).unwrap();
        let projection: Value = serde_json::from_str(text_blocks(&output)[1]).unwrap();
        let preview = projection[0]["content"].as_str().unwrap();
        assert_eq!(preview.chars().count(), WIKI_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_wiki_preview_short_content_untouched() {
        let page = WikiPage {
            slug: "home".into(),
            title: "Home".into(),
            format: WikiFormat::Markdown,
            content: Some("short".into()),
            encoding: None,
        };

        let output = wiki_pages_response(&Paged { count: 1, items: vec![page] }).unwrap();
        let projection: Value = serde_json::from_str(text_blocks(&output)[1]).unwrap();
        assert_eq!(projection[0]["content"], "short");
    }

    #[test]
    fn test_note_projection_shape() {
        let note: Note = serde_json::from_value(json!({
            "id": 9, "body": "LGTM",
            "author": {"id": 1, "username": "alice", "name": "Alice"},
            "created_at": "2024-01-01T00:00:00Z",
            "system": false
        }))
        .unwrap();

        let output = notes_response(&Paged { count: 1, items: vec![note] }).unwrap();
        let blocks = text_blocks(&output);
        assert_eq!(blocks[0], "Found 1 notes");
        let projection: Value = serde_json::from_str(blocks[1]).unwrap();
        assert_eq!(projection[0]["body"], "LGTM");
        assert_eq!(projection[0]["resolved"], false);
    }
}
