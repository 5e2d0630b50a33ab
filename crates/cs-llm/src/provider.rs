//! LLM Provider Traits and Types
//!
//! This module defines the common interface for all completion providers,
//! including tool calling.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Provider types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Anthropic,
    OpenAI,
    OpenAIResponses,
    Scripted,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Anthropic => write!(f, "anthropic"),
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::OpenAIResponses => write!(f, "openai_responses"),
            ProviderType::Scripted => write!(f, "scripted"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderType::Anthropic),
            "openai" | "open_ai" => Ok(ProviderType::OpenAI),
            "openai_responses" | "responses" => Ok(ProviderType::OpenAIResponses),
            "scripted" => Ok(ProviderType::Scripted),
            other => Err(format!("Unknown provider type: {}", other)),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Assistant turn that requested tool calls
    pub fn assistant_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCallInfo>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Tool call information from LLM response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallInfo {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Tool definition for LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// Convert to OpenAI chat-completions function calling format
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }

    /// Convert to the flat function format of the OpenAI Responses API
    pub fn to_responses_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters
        })
    }

    /// Convert to Anthropic format
    pub fn to_anthropic_format(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.parameters
        })
    }
}

/// Tool choice for LLM request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Let the model decide whether to use tools
    #[default]
    Auto,
    /// Force the model to call a tool
    Required,
    /// Disable tool usage
    None,
    /// Force a specific tool
    Tool(String),
}

impl ToolChoice {
    /// Convert to OpenAI format
    pub fn to_api_format(&self) -> Value {
        match self {
            ToolChoice::Auto => serde_json::json!("auto"),
            ToolChoice::Required => serde_json::json!("required"),
            ToolChoice::None => serde_json::json!("none"),
            ToolChoice::Tool(name) => serde_json::json!({
                "type": "function",
                "function": {"name": name}
            }),
        }
    }

    pub fn to_anthropic_format(&self) -> Value {
        match self {
            ToolChoice::Auto => serde_json::json!({"type": "auto"}),
            ToolChoice::Required => serde_json::json!({"type": "any"}),
            ToolChoice::None => serde_json::json!({"type": "none"}),
            ToolChoice::Tool(name) => serde_json::json!({
                "type": "tool",
                "name": name
            }),
        }
    }
}

/// Full chat request with tools
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// System prompt, if the request carries one
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }
}

/// Token usage information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    pub model: String,
    pub provider: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
    pub tool_calls: Option<Vec<ToolCallInfo>>,
}

impl ChatResponse {
    /// Plain assistant text reply
    pub fn text(provider: &str, model: &str, content: impl Into<String>) -> Self {
        Self {
            message: ChatMessage::assistant(content),
            model: model.to_string(),
            provider: provider.to_string(),
            finish_reason: Some("stop".to_string()),
            usage: None,
            tool_calls: None,
        }
    }

    /// Assistant reply that only requests tool calls
    pub fn with_tool_calls(provider: &str, model: &str, tool_calls: Vec<ToolCallInfo>) -> Self {
        Self {
            message: ChatMessage::assistant_tool_calls("", tool_calls.clone()),
            model: model.to_string(),
            provider: provider.to_string(),
            finish_reason: Some("tool_calls".to_string()),
            usage: None,
            tool_calls: Some(tool_calls),
        }
    }
}

/// Shared provider for dynamic dispatch
pub type BoxedProvider = Arc<dyn LlmProvider>;

/// LLM Provider trait
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider type
    fn provider_type(&self) -> ProviderType;

    /// Basic chat without tools
    async fn chat(&self, model: &str, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        self.chat_with_request(model, ChatRequest::new(messages)).await
    }

    /// Chat with full request including tools
    ///
    /// Implementations must pass the tools and tool choice to the API and
    /// parse tool calls out of the response.
    async fn chat_with_request(&self, model: &str, request: ChatRequest) -> Result<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> ToolDefinition {
        ToolDefinition {
            name: "get_court_availability".to_string(),
            description: "Courts for a day".to_string(),
            parameters: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    #[test]
    fn test_tool_definition_formats() {
        let openai = definition().to_openai_format();
        assert_eq!(openai["function"]["name"], "get_court_availability");

        let responses = definition().to_responses_format();
        assert_eq!(responses["name"], "get_court_availability");
        assert_eq!(responses["type"], "function");

        let anthropic = definition().to_anthropic_format();
        assert_eq!(anthropic["input_schema"]["type"], "object");
    }

    #[test]
    fn test_tool_choice_formats() {
        assert_eq!(ToolChoice::Required.to_api_format(), serde_json::json!("required"));
        assert_eq!(
            ToolChoice::Required.to_anthropic_format(),
            serde_json::json!({"type": "any"})
        );
    }

    #[test]
    fn test_provider_type_roundtrip() {
        assert_eq!("Responses".parse::<ProviderType>().unwrap(), ProviderType::OpenAIResponses);
        assert_eq!(ProviderType::OpenAI.to_string(), "openai");
        assert!("gemini".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_system_prompt() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You answer squash questions."),
            ChatMessage::user("Who is playing tonight?"),
        ]);
        assert_eq!(request.system_prompt(), Some("You answer squash questions."));
    }
}
