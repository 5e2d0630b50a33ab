//! Core Tool trait and types
//!
//! Defines the interface shared by every tool an agent can call.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::schema::{ParameterSchema, Parameters};

/// Core trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (unique identifier)
    fn name(&self) -> &str;

    /// Get the model-facing description
    fn description(&self) -> &str;

    /// Declared parameters, used for validation and advertising
    fn schema(&self) -> ParameterSchema;

    /// Get JSON schema advertised to the model
    fn input_schema(&self) -> Value {
        self.schema().to_json()
    }

    /// Execute the tool with already-validated parameters
    async fn execute(&self, params: Parameters) -> Result<String>;
}

/// Type alias for boxed tools
pub type BoxedTool = Arc<dyn Tool>;

/// Simple tool implementation for testing
#[derive(Clone)]
pub struct SimpleTool {
    name: String,
    description: String,
    schema: ParameterSchema,
    handler: Arc<dyn Fn(Parameters) -> Result<String> + Send + Sync>,
}

impl SimpleTool {
    pub fn new<F>(name: &str, description: &str, schema: ParameterSchema, handler: F) -> Self
    where
        F: Fn(Parameters) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Tool for SimpleTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> ParameterSchema {
        self.schema.clone()
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        (self.handler)(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamKind;

    #[tokio::test]
    async fn test_simple_tool() {
        let tool = SimpleTool::new(
            "echo",
            "Echo the message back",
            ParameterSchema::new().required("msg", ParamKind::String, "Message"),
            |params| Ok(params.get_str("msg").unwrap_or_default().to_string()),
        );

        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "Echo the message back");
        assert_eq!(tool.input_schema()["required"], serde_json::json!(["msg"]));

        let params = tool
            .schema()
            .validate(&serde_json::json!({"msg": "hello"}))
            .unwrap();
        assert_eq!(tool.execute(params).await.unwrap(), "hello");
    }
}
