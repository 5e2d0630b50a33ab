//! OpenAI Responses API client (background mode)
//!
//! ## API Endpoints
//!
//! | Endpoint | URL | Purpose |
//! |----------|-----|--------|
//! | Create | `POST /responses` | Start a background run |
//! | Retrieve | `GET /responses/{id}` | Poll the run status |
//!
//! Runs are created with `background: true` and polled with
//! [`poll_until`](crate::poll::poll_until) until they leave the
//! `queued`/`in_progress` states.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::openai::decode_arguments;
use crate::poll::{poll_until, PollConfig, PollStatus};
use crate::provider::{
    ChatMessage, ChatRequest, ChatResponse, LlmProvider, ProviderType, TokenUsage, ToolCallInfo,
    ToolChoice,
};

pub mod endpoints {
    pub const BASE_URL: &str = "https://api.openai.com/v1";
    pub const RESPONSES: &str = "/responses";
}

// =============================================================================
// DATA STRUCTURES
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct ResponseObject {
    id: String,
    status: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    error: Option<ResponseError>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(rename = "function_call")]
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum OutputContent {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
    total_tokens: u32,
}

// =============================================================================
// CLIENT IMPLEMENTATION
// =============================================================================

pub struct OpenAiResponsesClient {
    client: Client,
    api_key: String,
    api_url: String,
    poll: PollConfig,
}

impl OpenAiResponsesClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_url: endpoints::BASE_URL.to_string(),
            poll: PollConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let mut client = Self::new(api_key);
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            client.api_url = base.trim_end_matches('/').to_string();
        }
        Ok(client)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_url = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    async fn create(&self, body: &Value) -> Result<ResponseObject> {
        let url = format!("{}{}", self.api_url, endpoints::RESPONSES);
        debug!("Responses create: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .context("Failed to send Responses request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Responses API error {}: {}", status, body));
        }

        response
            .json()
            .await
            .context("Failed to parse Responses create reply")
    }

    async fn retrieve(&self, id: &str) -> Result<ResponseObject> {
        let url = format!("{}{}/{}", self.api_url, endpoints::RESPONSES, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to poll Responses run")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Responses API error {}: {}", status, body));
        }

        response
            .json()
            .await
            .context("Failed to parse Responses run status")
    }
}

fn tool_choice_format(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::Required => json!("required"),
        ToolChoice::None => json!("none"),
        ToolChoice::Tool(name) => json!({"type": "function", "name": name}),
    }
}

fn build_body(model: &str, request: &ChatRequest) -> Value {
    let mut input = Vec::new();
    for m in &request.messages {
        match m.role.as_str() {
            "system" => {}
            "tool" => input.push(json!({
                "type": "function_call_output",
                "call_id": m.tool_call_id.clone().unwrap_or_default(),
                "output": m.content,
            })),
            _ => {
                if !m.content.is_empty() || m.tool_calls.is_none() {
                    input.push(json!({"role": m.role, "content": m.content}));
                }
                for tc in m.tool_calls.iter().flatten() {
                    input.push(json!({
                        "type": "function_call",
                        "call_id": tc.id,
                        "name": tc.name,
                        "arguments": tc.arguments.to_string(),
                    }));
                }
            }
        }
    }

    let mut body = json!({
        "model": model,
        "input": input,
        "background": true,
        "store": true,
    });
    if let Some(system) = request.system_prompt() {
        body["instructions"] = json!(system);
    }
    if let Some(max_tokens) = request.max_tokens {
        body["max_output_tokens"] = json!(max_tokens);
    }
    if !request.tools.is_empty() {
        body["tools"] = json!(request
            .tools
            .iter()
            .map(|t| t.to_responses_format())
            .collect::<Vec<_>>());
        body["tool_choice"] = tool_choice_format(&request.tool_choice);
    }
    body
}

fn run_status(run: ResponseObject) -> PollStatus<ResponseObject> {
    match run.status.as_str() {
        "queued" | "in_progress" => PollStatus::Pending,
        "completed" | "incomplete" => PollStatus::Done(run),
        other => PollStatus::Failed(
            run.error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("status {}", other)),
        ),
    }
}

fn into_chat_response(model: &str, run: ResponseObject) -> ChatResponse {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for item in run.output {
        match item {
            OutputItem::Message { content } => {
                for part in content {
                    if let OutputContent::OutputText { text: t } = part {
                        text.push_str(&t);
                    }
                }
            }
            OutputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => tool_calls.push(ToolCallInfo {
                arguments: decode_arguments(&name, &arguments),
                id: call_id,
                name,
            }),
            OutputItem::Other => {}
        }
    }

    let tool_calls = if tool_calls.is_empty() {
        None
    } else {
        Some(tool_calls)
    };

    ChatResponse {
        message: ChatMessage {
            role: "assistant".to_string(),
            content: text,
            tool_calls: tool_calls.clone(),
            tool_call_id: None,
        },
        model: run.model.unwrap_or_else(|| model.to_string()),
        provider: "openai_responses".to_string(),
        finish_reason: Some(run.status),
        usage: run.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.total_tokens,
        }),
        tool_calls,
    }
}

#[async_trait]
impl LlmProvider for OpenAiResponsesClient {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAIResponses
    }

    async fn chat_with_request(&self, model: &str, request: ChatRequest) -> Result<ChatResponse> {
        info!("Responses run: model={}, tools={}", model, request.tools.len());

        let created = self.create(&build_body(model, &request)).await?;
        let id = created.id.clone();
        debug!("Responses run {} created with status {}", id, created.status);

        let run = match run_status(created) {
            PollStatus::Done(run) => run,
            PollStatus::Failed(reason) => return Err(anyhow::anyhow!("Run failed: {}", reason)),
            PollStatus::Pending => {
                poll_until(&self.poll, || async { Ok(run_status(self.retrieve(&id).await?)) })
                    .await?
            }
        };

        Ok(into_chat_response(model, run))
    }
}
