//! MCP server handler
//!
//! Implements the MCP protocol surface for the GitLab tools: the tool
//! catalog and tool invocation. Errors from tool execution are returned
//! in-band as error results rather than protocol errors, so clients can
//! show them to the operator.

use crate::config::AppConfig;
use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry, definitions};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, Tool,
    ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// GitLab MCP server handler
#[derive(Clone)]
pub struct GitLabMcpHandler {
    /// Server name for MCP
    name: String,
    /// Server version
    version: String,
    /// Tool registry
    registry: Arc<ToolRegistry>,
    /// GitLab client
    gitlab: Arc<GitLabClient>,
    /// Mutating tools are hidden and rejected when set
    read_only: bool,
}

impl GitLabMcpHandler {
    /// Create a new handler from configuration
    pub fn new(config: &AppConfig, gitlab: GitLabClient) -> Self {
        Self::new_with_shared(config, Arc::new(gitlab))
    }

    /// Create a new handler with a shared (Arc-wrapped) GitLab client.
    ///
    /// Useful when creating multiple handlers that share one client,
    /// e.g. for the HTTP transport with multiple concurrent sessions.
    pub fn new_with_shared(config: &AppConfig, gitlab: Arc<GitLabClient>) -> Self {
        let mut registry = ToolRegistry::new();
        definitions::register_all(&mut registry);

        info!(
            tools = registry.len(),
            read_only = config.read_only,
            "Initialized GitLab MCP handler"
        );

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            registry: Arc::new(registry),
            gitlab,
            read_only: config.read_only,
        }
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// Convert internal tool output to MCP result
    fn to_mcp_result(output: ToolOutput) -> CallToolResult {
        let content = output
            .content
            .into_iter()
            .map(|ContentBlock::Text(text)| Content::text(text))
            .collect();

        CallToolResult {
            content,
            is_error: Some(output.is_error),
            meta: None,
            structured_content: None,
        }
    }

    /// Convert registry tools to MCP tool definitions, filtered by mode
    fn get_mcp_tools(&self) -> Vec<Tool> {
        self.registry
            .visible_tools(self.read_only)
            .map(|tool| {
                // Convert schemars schema to MCP format (JsonObject = Map<String, Value>)
                let schema_value = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({}));

                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));

                if let Some(props) = schema_value.get("properties") {
                    input_schema.insert("properties".to_string(), props.clone());
                }
                if let Some(required) = schema_value.get("required") {
                    input_schema.insert("required".to_string(), required.clone());
                }

                Tool {
                    name: Cow::Borrowed(tool.name),
                    description: Some(Cow::Borrowed(tool.description)),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }
            })
            .collect()
    }

    /// Execute a tool call
    async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> CallToolResult {
        // Request id correlates the log lines of this invocation
        let request_id = format!("{:x}", rand::random::<u64>());
        let ctx = ToolContext {
            gitlab: self.gitlab.clone(),
            read_only: self.read_only,
            request_id,
        };

        let Some(arguments) = arguments else {
            return error_result(&ToolError::ArgumentsRequired);
        };

        match self
            .registry
            .execute(name, &ctx, Value::Object(arguments))
            .await
        {
            Ok(output) => Self::to_mcp_result(output),
            Err(e) => {
                error!(tool = %name, error = %e, "Tool execution failed");
                error_result(&e)
            }
        }
    }
}

fn error_result(error: &ToolError) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(format!("Error: {error}"))],
        is_error: Some(true),
        meta: None,
        structured_content: None,
    }
}

impl ServerHandler for GitLabMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "GitLab MCP Server - Access GitLab repositories, issues, merge requests and wikis"
                    .to_string(),
            ),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.get_mcp_tools(),
                next_cursor: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { Ok(self.execute_tool(&request.name, request.arguments).await) }
    }
}
