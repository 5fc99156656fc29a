//! Tool registry
//!
//! Manages the collection of available tools and dispatches invocations.
//! Dispatch order is fixed: name lookup, read-only gate, argument
//! deserialization, semantic validation, then execution. The first three
//! steps and validation never touch the network.

use crate::error::ToolError;
use crate::tools::executor::{OperationType, ToolContext, ToolExecutor, ToolInfo, ToolOutput};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use schemars::Schema;
use schemars::generate::SchemaSettings;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// A registered tool with all its metadata
pub struct RegisteredTool {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Read or write, for the read-only gate and catalog filtering
    pub operation: OperationType,
    /// JSON Schema for the tool's input
    pub input_schema: Schema,
    /// The tool handler
    handler: Box<dyn ToolHandler>,
}

/// Internal trait for type-erased tool handling
#[async_trait]
trait ToolHandler: Send + Sync {
    /// Deserialize, validate and execute with raw JSON arguments
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError>;
}

/// Generic tool handler implementation
struct TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T> ToolHandler for TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + Send + Sync + 'static,
{
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError> {
        let tool: T = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        // Semantic checks run before any upstream request
        tool.validate()?;

        tool.execute(ctx).await
    }
}

/// Tool registry
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    /// Registration order, kept so the catalog is stable across runs
    order: Vec<&'static str>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool
    pub fn register<T>(&mut self)
    where
        T: ToolExecutor
            + DeserializeOwned
            + schemars::JsonSchema
            + ToolInfo
            + Send
            + Sync
            + 'static,
    {
        let name = <T as ToolInfo>::name();

        let tool = RegisteredTool {
            name,
            description: <T as ToolInfo>::description(),
            operation: <T as ToolInfo>::operation_type(),
            input_schema: input_schema::<T>(),
            handler: Box::new(TypedToolHandler::<T>::new()),
        };

        self.order.push(name);
        self.tools.insert(name.to_string(), tool);

        debug!(name, "Registered tool");
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// All tools in registration order
    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.order.iter().filter_map(|name| self.tools.get(*name))
    }

    /// The tools visible to a client: everything, or only the read
    /// tools when running read-only
    pub fn visible_tools(&self, read_only: bool) -> impl Iterator<Item = &RegisteredTool> {
        self.tools()
            .filter(move |tool| !read_only || tool.operation == OperationType::Read)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    #[instrument(skip(self, ctx, args), fields(tool = %name, request_id = %ctx.request_id))]
    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        if ctx.read_only && tool.operation == OperationType::Write {
            warn!(tool = %name, "Rejected write tool in read-only mode");
            return Err(ToolError::ReadOnly(name.to_string()));
        }

        tool.handler.call(ctx, args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the input schema for a tool with every named subschema
/// inlined. The published catalog must be self-contained: a `$ref` into
/// a `$defs` section would be unresolvable once the schema is reshaped
/// into the tool listing.
fn input_schema<T: schemars::JsonSchema>() -> Schema {
    let mut settings = SchemaSettings::default();
    settings.inline_subschemas = true;
    settings.into_generator().into_root_schema_for::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_not_found() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nonexistent").is_none());
    }
}
