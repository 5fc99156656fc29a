//! Tool definitions
//!
//! Each module declares its tool input structs and registers them; the
//! server builds one registry from `register_all` at startup.

pub mod branches;
pub mod commits;
pub mod events;
pub mod files;
pub mod issues;
pub mod members;
pub mod merge_requests;
pub mod notes;
pub mod repository;
pub mod wiki;

use crate::tools::ToolRegistry;

/// Build a registry containing every tool
pub fn register_all(registry: &mut ToolRegistry) {
    repository::register(registry);
    files::register(registry);
    branches::register(registry);
    commits::register(registry);
    events::register(registry);
    issues::register(registry);
    merge_requests::register(registry);
    wiki::register(registry);
    members::register(registry);
    notes::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_register_all_registers_every_tool() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);
        assert_eq!(registry.len(), 24);
    }

    fn contains_ref(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                map.contains_key("$ref") || map.values().any(contains_ref)
            }
            Value::Array(items) => items.iter().any(contains_ref),
            _ => false,
        }
    }

    #[test]
    fn test_tool_schemas_are_self_contained() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        // Every published schema must resolve on its own: nested types
        // like the issue iid union are inlined, never referenced
        for tool in registry.tools() {
            let schema = serde_json::to_value(&tool.input_schema).unwrap();
            assert!(
                !contains_ref(&schema),
                "schema for {} contains a $ref",
                tool.name
            );
        }
    }

    #[test]
    fn test_union_typed_field_is_inlined() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        let schema = serde_json::to_value(
            &registry.get("list_issues").unwrap().input_schema,
        )
        .unwrap();
        let iid = &schema["properties"]["iid"];
        assert!(iid.get("$ref").is_none());
        assert!(iid.get("anyOf").is_some() || iid.get("type").is_some());
    }

    #[test]
    fn test_read_only_catalog_hides_write_tools() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        let visible: Vec<&str> = registry
            .visible_tools(true)
            .map(|tool| tool.name)
            .collect();

        assert_eq!(visible.len(), 13);
        assert!(visible.contains(&"list_commits"));
        assert!(!visible.contains(&"create_issue"));
        assert!(!visible.contains(&"push_files"));
    }
}
