//! Tool Registry
//!
//! Name-keyed store of the tools an agent may call. Registries are built once
//! per agent and only read afterwards; a deterministic registry tells its
//! agent to answer from structured data without asking a model to rephrase.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::tool::BoxedTool;

/// Tool definition metadata advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    fn of(tool: &BoxedTool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_registered: usize,
    pub replaced: u64,
    pub total_lookups: u64,
    pub misses: u64,
}

/// Tool Registry
pub struct ToolRegistry {
    tools: RwLock<HashMap<Arc<str>, BoxedTool>>,
    deterministic: bool,
    stats: RwLock<RegistryStats>,
}

impl ToolRegistry {
    /// Create a registry whose agent may use a model for phrasing
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            deterministic: false,
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Create a registry whose agent must return structured output verbatim
    pub fn deterministic() -> Self {
        Self {
            deterministic: true,
            ..Self::new()
        }
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Register a tool under its own name. A second registration with the
    /// same name replaces the first.
    pub async fn register(&self, tool: BoxedTool) {
        let name: Arc<str> = Arc::from(tool.name());
        let previous = self.tools.write().await.insert(name.clone(), tool);

        let mut stats = self.stats.write().await;
        if previous.is_some() {
            stats.replaced += 1;
            warn!("Tool {} re-registered, previous definition replaced", name);
        } else {
            stats.total_registered += 1;
            debug!("Registered tool: {}", name);
        }
    }

    /// Get a tool by name
    pub async fn get(&self, name: &str) -> Option<BoxedTool> {
        let tool = self.tools.read().await.get(name).cloned();

        let mut stats = self.stats.write().await;
        stats.total_lookups += 1;
        if tool.is_none() {
            stats.misses += 1;
        }
        tool
    }

    /// All tool definitions, sorted by name
    pub async fn list(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<ToolDefinition> = tools.values().map(ToolDefinition::of).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub async fn len(&self) -> usize {
        self.tools.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tools.read().await.is_empty()
    }

    /// Get registry statistics
    pub async fn stats(&self) -> RegistryStats {
        self.stats.read().await.clone()
    }

    /// Validate `args` against the tool's schema and run it
    pub async fn execute(&self, name: &str, args: &Value) -> Result<String> {
        let tool = self
            .get(name)
            .await
            .ok_or_else(|| anyhow!("Tool not found: {}", name))?;
        let params = tool.schema().validate(args)?;
        tool.execute(params).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamKind, ParameterSchema};
    use crate::tool::SimpleTool;

    fn constant(name: &str, reply: &'static str) -> BoxedTool {
        Arc::new(SimpleTool::new(
            name,
            "Test tool",
            ParameterSchema::new(),
            move |_| Ok(reply.to_string()),
        ))
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(constant("test", "ok")).await;

        assert!(registry.get("test").await.is_some());
        assert!(registry.get("missing").await.is_none());
        assert!(!registry.is_deterministic());
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = ToolRegistry::new();
        registry.register(constant("test", "first")).await;
        registry.register(constant("test", "second")).await;

        assert_eq!(registry.len().await, 1);
        let result = registry.execute("test", &Value::Null).await.unwrap();
        assert_eq!(result, "second");
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let registry = ToolRegistry::deterministic();
        registry.register(constant("get_box_results", "")).await;
        registry.register(constant("book_court", "")).await;
        registry.register(constant("get_court_availability", "")).await;

        let names: Vec<String> = registry.list().await.into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["book_court", "get_box_results", "get_court_availability"]);
        assert!(registry.is_deterministic());
    }

    #[tokio::test]
    async fn test_execute_validates_arguments() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(SimpleTool::new(
                "court",
                "Echo a court number",
                ParameterSchema::new().required("court", ParamKind::Integer, "Court"),
                |params| Ok(format!("Court {}", params.get_i64("court").unwrap_or(0))),
            )))
            .await;

        let ok = registry
            .execute("court", &serde_json::json!({"court": "2"}))
            .await
            .unwrap();
        assert_eq!(ok, "Court 2");

        let err = registry.execute("court", &serde_json::json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Missing parameter: court"));

        let err = registry.execute("nope", &Value::Null).await.unwrap_err();
        assert!(err.to_string().contains("Tool not found"));
    }

    #[tokio::test]
    async fn test_stats() {
        let registry = ToolRegistry::new();
        registry.register(constant("test", "ok")).await;
        registry.register(constant("test", "ok")).await;

        registry.get("test").await;
        registry.get("test").await;
        registry.get("other").await;

        let stats = registry.stats().await;
        assert_eq!(stats.total_registered, 1);
        assert_eq!(stats.replaced, 1);
        assert_eq!(stats.total_lookups, 3);
        assert_eq!(stats.misses, 1);
    }
}
