//! cs-llm: Model completion with tool calling
//!
//! ## Supported Providers & Endpoints
//!
//! | Provider | Base URL | Auth Method |
//! |----------|----------|-------------|
//! | Anthropic | `https://api.anthropic.com/v1` | `x-api-key: {KEY}` |
//! | OpenAI (chat completions) | `https://api.openai.com/v1` | `Bearer {KEY}` |
//! | OpenAI (responses, background) | `https://api.openai.com/v1` | `Bearer {KEY}` |
//!
//! ## Environment Variables
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-xxx   # Anthropic Claude
//! OPENAI_API_KEY=sk-xxx          # OpenAI or compatible
//! OPENAI_BASE_URL=https://...    # Optional OpenAI-compatible endpoint
//! ```

pub mod anthropic;
pub mod chat;
pub mod openai;
pub mod poll;
pub mod provider;
pub mod responses;
pub mod scripted;

pub use anthropic::AnthropicClient;
pub use chat::{ChatManager, Completion};
pub use openai::OpenAiClient;
pub use poll::{poll_until, PollConfig, PollStatus};
pub use provider::{
    BoxedProvider, ChatMessage, ChatRequest, ChatResponse, LlmProvider, ProviderType,
    TokenUsage, ToolCallInfo, ToolChoice, ToolDefinition,
};
pub use responses::OpenAiResponsesClient;
pub use scripted::ScriptedProvider;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::chat::{ChatManager, Completion};
    pub use super::provider::{
        ChatMessage, ChatRequest, ChatResponse, LlmProvider, ToolCallInfo, ToolChoice, ToolDefinition,
    };
}
