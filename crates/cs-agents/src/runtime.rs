//! Agent runtime - tools, model and the two-pass tool loop
//!
//! Every agent owns one runtime. The first model pass may request tool
//! calls; their results are shaped by the agent and handed back as tool
//! messages, and a second pass phrases only that shaped data.

use anyhow::{anyhow, Context, Result};
use cs_core::{AvailabilitySnapshot, ToolCall};
use cs_llm::{ChatManager, ChatMessage, ChatRequest, Completion, ToolDefinition};
use cs_tools::{invoke_tool_calls, InvocationConfig, ToolInvocation, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the tool loop produced
#[derive(Debug, Clone, Default)]
pub struct ToolLoopOutcome {
    /// Final model text, trimmed
    pub text: String,
    /// Tool results after agent shaping, in call order
    pub shaped: Vec<String>,
    pub calls: Vec<ToolCall>,
}

impl ToolLoopOutcome {
    /// Shaped results joined as one block
    pub fn shaped_block(&self) -> String {
        self.shaped
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub struct AgentRuntime {
    tools: Arc<ToolRegistry>,
    chat: Option<Arc<ChatManager>>,
    invocation: InvocationConfig,
}

impl AgentRuntime {
    pub fn new(tools: Arc<ToolRegistry>, chat: Option<Arc<ChatManager>>) -> Self {
        Self {
            tools,
            chat,
            invocation: InvocationConfig::default(),
        }
    }

    pub fn with_invocation_config(mut self, config: InvocationConfig) -> Self {
        self.invocation = config;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// A model is configured and the registry allows phrasing
    pub fn uses_model(&self) -> bool {
        self.chat.is_some() && !self.tools.is_deterministic()
    }

    fn chat(&self) -> Result<&ChatManager> {
        self.chat
            .as_deref()
            .ok_or_else(|| anyhow!("no language model is configured"))
    }

    /// Call one of the agent's own tools directly
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<String> {
        info!("Calling tool '{}' directly", name);
        self.tools.execute(name, &args).await
    }

    /// Fetch and decode one day of availability through the named tool
    pub async fn fetch_snapshot(&self, tool: &str, date: Option<&str>) -> Result<AvailabilitySnapshot> {
        let args = match date {
            Some(d) => serde_json::json!({ "date": d }),
            None => serde_json::json!({}),
        };
        let raw = self.call_tool(tool, args).await?;
        serde_json::from_str(&raw).context("booking site returned malformed availability")
    }

    /// The registry's tools in the model's definition format
    pub async fn model_tools(&self) -> Vec<ToolDefinition> {
        self.tools
            .list()
            .await
            .into_iter()
            .map(|def| ToolDefinition {
                name: def.name,
                description: def.description,
                parameters: def.input_schema,
            })
            .collect()
    }

    /// One system + user completion without tools
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<Completion> {
        self.chat()?.complete(system, prompt, Vec::new()).await
    }

    /// Ask the model to restate `data` for the member, adding nothing
    pub async fn rephrase(&self, system: &str, prompt: &str, data: &str) -> Result<String> {
        let message = format!(
            "Member question: {}\n\nData (the only facts you may use):\n{}",
            prompt, data
        );
        let completion = self.complete(system, &message).await?;
        Ok(completion.text)
    }

    /// Offer the agent's tools, run what the model asks for, shape each
    /// successful result with `shape`, then ask for the final wording.
    pub async fn run_tool_loop<F>(&self, system: &str, prompt: &str, shape: F) -> Result<ToolLoopOutcome>
    where
        F: Fn(&ToolCall) -> String,
    {
        let chat = self.chat()?;
        let tools = self.model_tools().await;
        let mut messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];

        let first: Completion = chat
            .chat_with_request(ChatRequest::new(messages.clone()).with_tools(tools))
            .await?
            .into();

        if !first.has_tool_calls() {
            debug!("Model answered without tools");
            return Ok(ToolLoopOutcome {
                text: first.text,
                ..Default::default()
            });
        }

        let invocations: Vec<ToolInvocation> = first
            .tool_calls
            .iter()
            .map(|c| ToolInvocation::new(c.id.clone(), c.name.clone(), c.arguments.clone()))
            .collect();
        let outcomes = invoke_tool_calls(&self.tools, invocations, &self.invocation).await;

        messages.push(ChatMessage::assistant_tool_calls(
            first.text.clone(),
            first.tool_calls.clone(),
        ));

        let mut outcome = ToolLoopOutcome::default();
        for requested in &first.tool_calls {
            let content = match outcomes.iter().find(|o| o.id == requested.id) {
                Some(done) => {
                    let shaped = if done.success {
                        shape(&done.call)
                    } else {
                        done.call.result.clone()
                    };
                    outcome.shaped.push(shaped.clone());
                    outcome.calls.push(done.call.clone());
                    shaped
                }
                None => {
                    warn!("No result for tool call '{}'", requested.name);
                    format!("Unknown tool: {}", requested.name)
                }
            };
            messages.push(ChatMessage::tool_result(requested.id.clone(), content));
        }

        let second: Completion = chat
            .chat_with_request(ChatRequest::new(messages))
            .await?
            .into();
        outcome.text = second.text;
        Ok(outcome)
    }
}
