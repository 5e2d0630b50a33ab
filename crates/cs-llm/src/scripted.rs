//! Scripted provider
//!
//! Replays a queue of canned replies and records every request it receives.
//! Used by agent and router tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::provider::{ChatRequest, ChatResponse, LlmProvider, ProviderType, ToolCallInfo};

pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply
    pub fn reply_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(ChatResponse::text("scripted", "scripted", text)))
    }

    /// Queue a reply that requests tool calls
    pub fn reply_tool_calls(self, calls: Vec<ToolCallInfo>) -> Self {
        self.push(Ok(ChatResponse::with_tool_calls("scripted", "scripted", calls)))
    }

    /// Queue a failed call
    pub fn reply_error(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.push(Err(anyhow!(message)))
    }

    fn push(self, reply: Result<ChatResponse>) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Model names the requests were addressed to
    pub fn models(&self) -> Vec<String> {
        self.models.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Scripted
    }

    async fn chat_with_request(&self, model: &str, request: ChatRequest) -> Result<ChatResponse> {
        if let Ok(mut models) = self.models.lock() {
            models.push(model.to_string());
        }
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.replies
            .lock()
            .map_err(|_| anyhow!("scripted provider lock poisoned"))?
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("scripted provider has no replies left")))
    }
}
