//! cs-agents: Domain agents for the booking assistant
//!
//! An agent answers one kind of prompt. It reads what it can from the prompt
//! locally, calls its own tools, shapes the data, and only then (optionally)
//! lets a language model phrase the answer. Agents never fail: errors come
//! back as an apology naming the problem.

pub mod agent_catalog;
pub mod agent_registry;
pub mod agents;
pub mod prompts;
pub mod runtime;

pub use agent_catalog::{builtin_agents, AgentServices};
pub use agent_registry::{AgentDescriptor, AgentRegistry};
pub use agents::{
    apology, Agent, BookingAgent, BoxPositionsAgent, BoxResultsAgent, BoxedAgent,
    CancellationAgent, CourtAvailabilityAgent, StatsAgent,
};
pub use runtime::{AgentRuntime, ToolLoopOutcome};
