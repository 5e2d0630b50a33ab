//! Built-in agent wiring
//!
//! Each agent gets its own tool registry holding only the tools it may call.

use cs_llm::ChatManager;
use cs_tools::builtin::{
    BookCourtTool, CancelBookingTool, GetBoxPositionsTool, GetBoxResultsTool,
    GetCourtAvailabilityTool,
};
use cs_tools::{AvailabilitySource, BookingGateway, BoxLeagueSource, BoxedTool, ToolRegistry};
use std::sync::Arc;
use tracing::info;

use crate::agent_registry::AgentRegistry;
use crate::agents::{
    BookingAgent, BoxPositionsAgent, BoxResultsAgent, CancellationAgent, CourtAvailabilityAgent,
    StatsAgent,
};
use crate::runtime::AgentRuntime;

/// Collaborators shared by the built-in agents
#[derive(Clone)]
pub struct AgentServices {
    pub availability: Arc<dyn AvailabilitySource>,
    pub booking: Arc<dyn BookingGateway>,
    pub boxes: Arc<dyn BoxLeagueSource>,
    pub chat: Option<Arc<ChatManager>>,
    /// Answer from structured data only, even with a model configured
    pub deterministic: bool,
}

impl AgentServices {
    async fn runtime(&self, tools: Vec<BoxedTool>) -> AgentRuntime {
        let registry = if self.deterministic {
            ToolRegistry::deterministic()
        } else {
            ToolRegistry::new()
        };
        for tool in tools {
            registry.register(tool).await;
        }
        AgentRuntime::new(Arc::new(registry), self.chat.clone())
    }

    fn availability_tool(&self) -> BoxedTool {
        Arc::new(GetCourtAvailabilityTool::new(self.availability.clone()))
    }

    /// Every built-in tool in one registry, for inspection over HTTP
    pub async fn tool_registry(&self) -> ToolRegistry {
        let registry = ToolRegistry::new();
        let tools: Vec<BoxedTool> = vec![
            self.availability_tool(),
            Arc::new(BookCourtTool::new(self.booking.clone())),
            Arc::new(CancelBookingTool::new(self.booking.clone())),
            Arc::new(GetBoxPositionsTool::new(self.boxes.clone())),
            Arc::new(GetBoxResultsTool::new(self.boxes.clone())),
        ];
        for tool in tools {
            registry.register(tool).await;
        }
        registry
    }
}

/// Registry with one agent per routing label
pub async fn builtin_agents(services: &AgentServices) -> AgentRegistry {
    let registry = AgentRegistry::new();

    let runtime = services.runtime(vec![services.availability_tool()]).await;
    registry.register(Arc::new(CourtAvailabilityAgent::new(runtime))).await;

    let runtime = services
        .runtime(vec![Arc::new(BookCourtTool::new(services.booking.clone())) as BoxedTool])
        .await;
    registry.register(Arc::new(BookingAgent::new(runtime))).await;

    let runtime = services
        .runtime(vec![Arc::new(CancelBookingTool::new(services.booking.clone())) as BoxedTool])
        .await;
    registry.register(Arc::new(CancellationAgent::new(runtime))).await;

    let runtime = services
        .runtime(vec![Arc::new(GetBoxPositionsTool::new(services.boxes.clone())) as BoxedTool])
        .await;
    registry.register(Arc::new(BoxPositionsAgent::new(runtime))).await;

    let runtime = services
        .runtime(vec![Arc::new(GetBoxResultsTool::new(services.boxes.clone())) as BoxedTool])
        .await;
    registry.register(Arc::new(BoxResultsAgent::new(runtime))).await;

    let runtime = services.runtime(vec![services.availability_tool()]).await;
    registry.register(Arc::new(StatsAgent::new(runtime))).await;

    info!(
        "Built {} agents (model: {}, deterministic: {})",
        registry.len().await,
        services.chat.is_some(),
        services.deterministic
    );
    registry
}
