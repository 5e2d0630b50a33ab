//! OpenAI-compatible Chat Completions Client
//!
//! ## API Endpoints
//!
//! | Endpoint | URL | Purpose |
//! |----------|-----|--------|
//! | Base URL | `https://api.openai.com/v1` | Override with `OPENAI_BASE_URL` |
//! | Chat | `/chat/completions` | Chat completions with function calling |
//!
//! ## Authentication
//! - Header: `Authorization: Bearer {OPENAI_API_KEY}`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::provider::{
    ChatMessage, ChatRequest, ChatResponse, LlmProvider, ProviderType, TokenUsage, ToolCallInfo,
};

// =============================================================================
// API ENDPOINT CONFIGURATION
// =============================================================================

pub mod endpoints {
    pub const BASE_URL: &str = "https://api.openai.com/v1";
    pub const CHAT_COMPLETIONS: &str = "/chat/completions";
}

// =============================================================================
// DATA STRUCTURES
// =============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: OpenAiFunction,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunction {
    name: String,
    /// JSON-encoded arguments
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    model: Option<String>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// =============================================================================
// CLIENT IMPLEMENTATION
// =============================================================================

/// Client for OpenAI and OpenAI-compatible chat endpoints
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_url: endpoints::BASE_URL.to_string(),
        }
    }

    /// Create from `OPENAI_API_KEY`, honouring `OPENAI_BASE_URL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let mut client = Self::new(api_key);
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            client.api_url = base.trim_end_matches('/').to_string();
        }
        Ok(client)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let mut client = Self::new(api_key);
        client.api_url = endpoint.into().trim_end_matches('/').to_string();
        client
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Decode the JSON-encoded arguments of a function call. Malformed
/// arguments become an empty object so validation reports what is missing.
pub(crate) fn decode_arguments(name: &str, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Tool call {} has malformed arguments: {}", name, e);
        Value::Object(Default::default())
    })
}

fn build_request(model: &str, request: &ChatRequest) -> OpenAiRequest {
    let messages = request
        .messages
        .iter()
        .map(|m| OpenAiMessage {
            role: m.role.clone(),
            content: Some(m.content.clone()),
            tool_calls: m.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| OpenAiToolCall {
                        id: tc.id.clone(),
                        kind: function_type(),
                        function: OpenAiFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.to_string(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: m.tool_call_id.clone(),
        })
        .collect();

    let (tools, tool_choice) = if request.tools.is_empty() {
        (None, None)
    } else {
        (
            Some(request.tools.iter().map(|t| t.to_openai_format()).collect()),
            Some(request.tool_choice.to_api_format()),
        )
    };

    OpenAiRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature.or(Some(0.2)),
        tools,
        tool_choice,
    }
}

fn parse_response(model: &str, result: OpenAiResponse) -> Result<ChatResponse> {
    let choice = result
        .choices
        .into_iter()
        .next()
        .context("OpenAI response contained no choices")?;

    let tool_calls: Vec<ToolCallInfo> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCallInfo {
            arguments: decode_arguments(&tc.function.name, &tc.function.arguments),
            id: tc.id,
            name: tc.function.name,
        })
        .collect();
    let tool_calls = if tool_calls.is_empty() {
        None
    } else {
        Some(tool_calls)
    };

    Ok(ChatResponse {
        message: ChatMessage {
            role: "assistant".to_string(),
            content: choice.message.content.unwrap_or_default(),
            tool_calls: tool_calls.clone(),
            tool_call_id: None,
        },
        model: result.model.unwrap_or_else(|| model.to_string()),
        provider: "openai".to_string(),
        finish_reason: choice.finish_reason,
        usage: result.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        tool_calls,
    })
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    async fn chat_with_request(&self, model: &str, request: ChatRequest) -> Result<ChatResponse> {
        info!(
            "OpenAI chat: model={}, endpoint={}, tools={}",
            model,
            self.api_url,
            request.tools.len()
        );

        let url = format!("{}{}", self.api_url, endpoints::CHAT_COMPLETIONS);
        let api_request = build_request(model, &request);
        debug!("OpenAI request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .context("Failed to send OpenAI request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API error {}: {}", status, body));
        }

        let result: OpenAiResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        parse_response(model, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_request_encodes_arguments_as_string() {
        let request = ChatRequest::new(vec![ChatMessage::assistant_tool_calls(
            "",
            vec![ToolCallInfo {
                id: "call_1".to_string(),
                name: "book_court".to_string(),
                arguments: json!({"time": "18:00"}),
            }],
        )]);

        let body = serde_json::to_value(build_request("gpt-test", &request)).unwrap();
        let call = &body["messages"][0]["tool_calls"][0];
        assert_eq!(call["type"], "function");
        assert_eq!(call["function"]["arguments"], "{\"time\":\"18:00\"}");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_response_decodes_arguments() {
        let raw: OpenAiResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "get_box_positions", "arguments": "{\"box\": 2}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let response = parse_response("gpt-test", raw).unwrap();
        assert_eq!(response.model, "gpt-test");
        assert_eq!(response.message.content, "");
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls[0].arguments, json!({"box": 2}));
    }

    #[test]
    fn test_malformed_arguments_become_empty_object() {
        assert_eq!(decode_arguments("x", "{not json"), json!({}));
        assert_eq!(decode_arguments("x", ""), json!({}));
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let raw: OpenAiResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(parse_response("gpt-test", raw).is_err());
    }
}
