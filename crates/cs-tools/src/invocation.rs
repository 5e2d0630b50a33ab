//! Tool invocation protocol
//!
//! Turns the function calls a model requested in one turn into text results:
//! lookup, validate, execute. All calls of a turn run concurrently and a
//! failing call never aborts its siblings.

use cs_core::ToolCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::registry::ToolRegistry;

/// Configuration for tool invocation
#[derive(Debug, Clone)]
pub struct InvocationConfig {
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// A function call as requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Provider call id, echoed back in the tool result message
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of one dispatched call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub id: String,
    pub call: ToolCall,
    pub success: bool,
}

/// Dispatch every call concurrently. Calls naming an unknown tool are
/// skipped; validation and execution failures become text results.
pub async fn invoke_tool_calls(
    registry: &ToolRegistry,
    calls: Vec<ToolInvocation>,
    config: &InvocationConfig,
) -> Vec<ToolOutcome> {
    let futures: Vec<_> = calls
        .into_iter()
        .map(|call| invoke_one(registry, call, config))
        .collect();

    futures::future::join_all(futures)
        .await
        .into_iter()
        .flatten()
        .collect()
}

async fn invoke_one(
    registry: &ToolRegistry,
    call: ToolInvocation,
    config: &InvocationConfig,
) -> Option<ToolOutcome> {
    let Some(tool) = registry.get(&call.name).await else {
        warn!("Model requested unknown tool '{}', skipping", call.name);
        return None;
    };

    let raw_parameters = match &call.arguments {
        Value::Object(map) => map.clone().into_iter().collect(),
        _ => Default::default(),
    };

    let params = match tool.schema().validate(&call.arguments) {
        Ok(params) => params,
        Err(e) => {
            warn!("Invalid arguments for tool '{}': {}", call.name, e);
            return Some(ToolOutcome {
                id: call.id,
                call: ToolCall::new(
                    call.name.clone(),
                    raw_parameters,
                    format!("Invalid arguments for {}: {}", call.name, e),
                ),
                success: false,
            });
        }
    };

    let parameters = params.to_json_map();
    info!("Executing tool '{}'", call.name);
    debug!("Tool '{}' parameters: {:?}", call.name, parameters);

    let duration = Duration::from_millis(config.timeout_ms);
    let (result, success) = match timeout(duration, tool.execute(params)).await {
        Ok(Ok(text)) => (text, true),
        Ok(Err(e)) => {
            warn!("Tool '{}' failed: {}", call.name, e);
            (format!("Tool {} failed: {}", call.name, e), false)
        }
        Err(_) => {
            warn!("Tool '{}' timed out after {}ms", call.name, config.timeout_ms);
            (
                format!(
                    "Tool {} timed out after {}ms",
                    call.name, config.timeout_ms
                ),
                false,
            )
        }
    };

    Some(ToolOutcome {
        id: call.id,
        call: ToolCall::new(call.name, parameters, result),
        success,
    })
}
