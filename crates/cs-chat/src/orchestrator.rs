//! Prompt orchestrator: route, then hand off to the agent

use cs_agents::AgentRegistry;
use cs_core::{AgentKind, RequestContext};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::router::PrimaryRouter;

/// Which agent answered and what it said
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptOutcome {
    pub agent: AgentKind,
    pub message: String,
}

pub struct PromptOrchestrator {
    router: PrimaryRouter,
    agents: Arc<AgentRegistry>,
}

impl PromptOrchestrator {
    pub fn new(router: PrimaryRouter, agents: Arc<AgentRegistry>) -> Self {
        Self { router, agents }
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub async fn handle(&self, prompt: &str, ctx: &RequestContext) -> PromptOutcome {
        let routed = self.router.route(prompt).await;
        self.dispatch(routed, prompt, ctx).await
    }

    /// Skip routing and ask one agent directly
    pub async fn handle_with(&self, kind: AgentKind, prompt: &str, ctx: &RequestContext) -> PromptOutcome {
        self.dispatch(kind, prompt, ctx).await
    }

    async fn dispatch(&self, kind: AgentKind, prompt: &str, ctx: &RequestContext) -> PromptOutcome {
        let agent = match self.agents.get(kind).await {
            Some(agent) => Some(agent),
            None => {
                warn!("No agent registered for '{}', using court_availability", kind);
                self.agents.get(AgentKind::CourtAvailability).await
            }
        };

        let Some(agent) = agent else {
            return PromptOutcome {
                agent: kind,
                message: "Sorry, no assistant is available to answer that right now.".to_string(),
            };
        };

        let start = Instant::now();
        let message = agent.handle(prompt, ctx).await;
        info!(
            agent = %agent.kind(),
            session = ctx.session_id.as_deref().unwrap_or("-"),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Prompt answered"
        );

        PromptOutcome {
            agent: agent.kind(),
            message,
        }
    }
}
