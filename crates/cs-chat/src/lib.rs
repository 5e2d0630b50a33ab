//! cs-chat: prompt routing and orchestration
//!
//! The router picks an `AgentKind` for a free-text prompt; the orchestrator
//! hands the prompt to the registered agent for that kind.

pub mod orchestrator;
pub mod router;

pub use orchestrator::{PromptOrchestrator, PromptOutcome};
pub use router::{keyword_route, PrimaryRouter};
