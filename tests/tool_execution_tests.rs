//! Tool execution integration tests
//!
//! Run whole tools against a mocked GitLab API: argument validation must
//! reject bad input before any request, and good input must come back in
//! the documented response envelope.

use gitlab_mcp::config::GitLabConfig;
use gitlab_mcp::error::ToolError;
use gitlab_mcp::gitlab::GitLabClient;
use gitlab_mcp::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry, definitions};
use gitlab_mcp::util::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn build_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    definitions::register_all(&mut registry);
    registry
}

fn test_context(mock_server: &MockServer) -> ToolContext {
    let config = GitLabConfig {
        api_url: mock_server.uri(),
        token: SecretString::new("glpat-test"),
        timeout_secs: 30,
    };
    ToolContext {
        gitlab: Arc::new(GitLabClient::new(&config).unwrap()),
        read_only: false,
        request_id: "test".to_string(),
    }
}

/// Mock server where any request is a test failure
async fn untouchable_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    mock_server
}

fn text_blocks(output: &ToolOutput) -> Vec<&str> {
    output
        .content
        .iter()
        .map(|ContentBlock::Text(t)| t.as_str())
        .collect()
}

#[tokio::test]
async fn test_per_page_over_limit_rejected_before_network() {
    let mock_server = untouchable_server().await;
    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let err = registry
        .execute(
            "list_issues",
            &ctx,
            json!({"project_id": "42", "per_page": 101}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments(_)));
    assert!(err.to_string().contains("per_page"));
}

#[tokio::test]
async fn test_page_zero_rejected_before_network() {
    let mock_server = untouchable_server().await;
    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let err = registry
        .execute("list_commits", &ctx, json!({"project_id": "42", "page": 0}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments(_)));
    assert!(err.to_string().contains("page"));
}

#[tokio::test]
async fn test_date_only_timestamp_rejected_before_network() {
    let mock_server = untouchable_server().await;
    let registry = build_registry();
    let ctx = test_context(&mock_server);

    // A bare date is not a full ISO 8601 timestamp
    let err = registry
        .execute(
            "list_issues",
            &ctx,
            json!({"project_id": "42", "created_after": "2024-01-01"}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments(_)));
    assert!(err.to_string().contains("created_after"));
}

#[tokio::test]
async fn test_wiki_tool_requires_exactly_one_scope() {
    let mock_server = untouchable_server().await;
    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let neither = registry
        .execute("list_wiki_pages", &ctx, json!({}))
        .await
        .unwrap_err();
    assert!(matches!(neither, ToolError::InvalidArguments(_)));

    let both = registry
        .execute(
            "list_wiki_pages",
            &ctx,
            json!({"project_id": "42", "group_id": "7"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(both, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn test_list_commits_produces_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/repository/commits"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {
                        "id": "abc123def",
                        "short_id": "abc123",
                        "title": "Fix the build",
                        "author_name": "Alice",
                        "author_email": "alice@example.com",
                        "authored_date": "2024-01-02T10:00:00Z",
                        "committer_name": "Alice",
                        "committer_email": "alice@example.com",
                        "committed_date": "2024-01-02T10:00:00Z",
                        "created_at": "2024-01-02T10:00:00Z",
                        "web_url": "https://gitlab.example.com/group/app/-/commit/abc123def"
                    },
                    {
                        "id": "456789abc",
                        "short_id": "456789",
                        "title": "Add feature",
                        "author_name": "Bob",
                        "author_email": "bob@example.com",
                        "authored_date": "2024-01-01T09:00:00Z",
                        "committer_name": "Bob",
                        "committer_email": "bob@example.com",
                        "committed_date": "2024-01-01T09:00:00Z",
                        "web_url": "https://gitlab.example.com/group/app/-/commit/456789abc"
                    }
                ]))
                .insert_header("X-Total", "2"),
        )
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let output = registry
        .execute("list_commits", &ctx, json!({"project_id": "42"}))
        .await
        .unwrap();

    let blocks = text_blocks(&output);
    assert_eq!(blocks[0], "Found 2 commits");

    let items: Value = serde_json::from_str(blocks[1]).unwrap();
    assert_eq!(items[0]["title"], "Fix the build");
    assert_eq!(items[1]["short_id"], "456789");
}

#[tokio::test]
async fn test_empty_issue_list_keeps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("X-Total", "0"),
        )
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let output = registry
        .execute("list_issues", &ctx, json!({"project_id": "42"}))
        .await
        .unwrap();

    let blocks = text_blocks(&output);
    assert_eq!(blocks[0], "Found 0 issues");
    assert_eq!(blocks[1], "[]");
}

#[tokio::test]
async fn test_list_wiki_pages_summary_uses_header_total() {
    let mock_server = MockServer::start().await;

    // One page of a larger wiki: the envelope reports the server total
    Mock::given(method("GET"))
        .and(path("/projects/42/wikis"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"slug": "home", "title": "Home", "format": "markdown"}
                ]))
                .insert_header("X-Total", "5"),
        )
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let output = registry
        .execute("list_wiki_pages", &ctx, json!({"project_id": "42"}))
        .await
        .unwrap();

    let blocks = text_blocks(&output);
    assert_eq!(blocks[0], "Found 5 wiki pages");
    let items: Value = serde_json::from_str(blocks[1]).unwrap();
    assert_eq!(items[0]["slug"], "home");
}

#[tokio::test]
async fn test_list_issues_accepts_numeric_iid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {
                        "id": 101, "iid": 1, "project_id": 42, "title": "First",
                        "state": "opened",
                        "author": {"id": 1, "username": "alice", "name": "Alice"},
                        "created_at": "2024-01-01T00:00:00Z",
                        "web_url": "https://gitlab.example.com/group/app/-/issues/1"
                    },
                    {
                        "id": 102, "iid": 2, "project_id": 42, "title": "Second",
                        "state": "opened",
                        "author": {"id": 1, "username": "alice", "name": "Alice"},
                        "created_at": "2024-01-01T00:00:00Z",
                        "web_url": "https://gitlab.example.com/group/app/-/issues/2"
                    }
                ]))
                .insert_header("X-Total", "2"),
        )
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let output = registry
        .execute("list_issues", &ctx, json!({"project_id": "42", "iid": 2}))
        .await
        .unwrap();

    let blocks = text_blocks(&output);
    assert_eq!(blocks[0], "Found 1 issues");
    let items: Value = serde_json::from_str(blocks[1]).unwrap();
    assert_eq!(items[0]["title"], "Second");
}

#[tokio::test]
async fn test_push_files_stops_at_first_failure_and_names_it() {
    let mock_server = MockServer::start().await;

    // Neither file exists, so both go down the create path
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/files/a.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/files/b.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/42/repository/files/a.txt"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "file_path": "a.txt",
            "branch": "main",
            "id": "c1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/42/repository/files/b.txt"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "403 Forbidden"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let err = registry
        .execute(
            "push_files",
            &ctx,
            json!({
                "project_id": "42",
                "branch": "main",
                "commit_message": "Add files",
                "files": [
                    {"file_path": "a.txt", "content": "one"},
                    {"file_path": "b.txt", "content": "two"}
                ]
            }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::ExecutionFailed(_)));
    assert!(err.to_string().contains("failed to push 'b.txt'"));
}

#[tokio::test]
async fn test_push_files_rejects_empty_file_list() {
    let mock_server = untouchable_server().await;
    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let err = registry
        .execute(
            "push_files",
            &ctx,
            json!({
                "project_id": "42",
                "branch": "main",
                "commit_message": "Nothing",
                "files": []
            }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments(_)));
    assert!(err.to_string().contains("files"));
}

#[tokio::test]
async fn test_delete_wiki_page_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/projects/42/wikis/home"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = build_registry();
    let ctx = test_context(&mock_server);

    let output = registry
        .execute(
            "delete_wiki_page",
            &ctx,
            json!({"project_id": "42", "slug": "home"}),
        )
        .await
        .unwrap();

    let blocks = text_blocks(&output);
    let result: Value = serde_json::from_str(blocks[0]).unwrap();
    assert_eq!(result["status"], "deleted");
    assert_eq!(result["slug"], "home");
}
