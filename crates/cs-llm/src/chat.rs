//! Chat Manager - the agent-facing completion facade
//!
//! Wraps one configured provider and the configured model name. Agents and the
//! router only talk to models through this type.

use anyhow::{anyhow, Context, Result};
use cs_core::config::{CourtsideConfig, LlmBackend};
use std::sync::Arc;
use tracing::{debug, info};

use crate::anthropic::AnthropicClient;
use crate::openai::OpenAiClient;
use crate::poll::PollConfig;
use crate::provider::{
    BoxedProvider, ChatMessage, ChatRequest, ChatResponse, ProviderType, ToolCallInfo,
    ToolDefinition,
};
use crate::responses::OpenAiResponsesClient;

/// Text and tool calls returned by one completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tool_calls: Vec<ToolCallInfo>,
}

impl Completion {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

impl From<ChatResponse> for Completion {
    fn from(response: ChatResponse) -> Self {
        Self {
            text: response.message.content.trim().to_string(),
            tool_calls: response.tool_calls.unwrap_or_default(),
        }
    }
}

pub struct ChatManager {
    provider: BoxedProvider,
    model: String,
}

impl ChatManager {
    pub fn new(provider: BoxedProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Build the manager for the configured backend. Returns `None` when no
    /// model is configured; agents then answer from structured data only.
    pub fn from_config(config: &CourtsideConfig) -> Result<Option<Self>> {
        let provider: BoxedProvider = match config.llm_backend {
            LlmBackend::None => {
                info!("No language model configured");
                return Ok(None);
            }
            LlmBackend::Anthropic => {
                let key = config
                    .anthropic_api_key
                    .clone()
                    .context("ANTHROPIC_API_KEY is required for the anthropic backend")?;
                Arc::new(AnthropicClient::new(key))
            }
            LlmBackend::OpenAi => {
                let key = config
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY is required for the openai backend")?;
                match &config.openai_base_url {
                    Some(base) => Arc::new(OpenAiClient::with_endpoint(key, base)),
                    None => Arc::new(OpenAiClient::new(key)),
                }
            }
            LlmBackend::OpenAiResponses => {
                let key = config
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY is required for the openai_responses backend")?;
                let mut client = OpenAiResponsesClient::new(key)
                    .with_poll_config(PollConfig::from_millis(config.poll_interval_ms));
                if let Some(base) = &config.openai_base_url {
                    client = client.with_endpoint(base);
                }
                Arc::new(client)
            }
        };

        if config.model.is_empty() {
            return Err(anyhow!("COURTSIDE_MODEL is empty"));
        }

        info!(
            "Language model: provider={}, model={}",
            provider.provider_type(),
            config.model
        );
        Ok(Some(Self::new(provider, config.model.clone())))
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider.provider_type()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a full request to the configured model
    pub async fn chat_with_request(&self, request: ChatRequest) -> Result<ChatResponse> {
        debug!(
            "Chat request: model={}, messages={}, tools={}",
            self.model,
            request.messages.len(),
            request.tools.len()
        );
        self.provider.chat_with_request(&self.model, request).await
    }

    /// One system + user turn, optionally offering tools
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
        tools: Vec<ToolDefinition>,
    ) -> Result<Completion> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(prompt)])
            .with_tools(tools);
        Ok(self.chat_with_request(request).await?.into())
    }
}
