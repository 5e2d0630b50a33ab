//! Shared application state and collaborator wiring

use anyhow::Result;
use cs_agents::{builtin_agents, AgentServices};
use cs_chat::{PrimaryRouter, PromptOrchestrator};
use cs_core::CourtsideConfig;
use cs_llm::ChatManager;
use cs_tools::{
    AvailabilitySource, BookingGateway, BoxLeagueSource, DryRunBookingGateway, Fixture,
    HttpBookingSite, StaticAvailabilitySource, StaticBoxLeague, ToolRegistry,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub orchestrator: PromptOrchestrator,
    /// All built-in tools, mounted at /api/tools
    pub tools: Arc<ToolRegistry>,
    pub model: Option<String>,
    pub deterministic: bool,
}

impl AppState {
    pub async fn new(services: AgentServices) -> Self {
        let agents = builtin_agents(&services).await;
        let tools = Arc::new(services.tool_registry().await);
        let model = services.chat.as_ref().map(|chat| chat.model().to_string());

        Self {
            orchestrator: PromptOrchestrator::new(
                PrimaryRouter::new(services.chat.clone()),
                Arc::new(agents),
            ),
            tools,
            model,
            deterministic: services.deterministic || services.chat.is_none(),
        }
    }
}

/// Pick the data sources: a fixture file wins over the booking proxy.
/// Without either the service still starts, answering from empty data.
pub fn build_services(config: &CourtsideConfig) -> Result<AgentServices> {
    let site = config.booking_url.as_deref().map(|url| {
        info!("Booking proxy: {}", url);
        Arc::new(HttpBookingSite::new(url))
    });

    let (availability, boxes) = match (&config.fixture, &site) {
        (Some(path), _) => {
            let fixture = Fixture::load(path)?;
            (
                Arc::new(fixture.availability_source()) as Arc<dyn AvailabilitySource>,
                Arc::new(fixture.box_league()) as Arc<dyn BoxLeagueSource>,
            )
        }
        (None, Some(site)) => (
            site.clone() as Arc<dyn AvailabilitySource>,
            site.clone() as Arc<dyn BoxLeagueSource>,
        ),
        (None, None) => {
            warn!("No fixture or booking proxy configured, serving empty data");
            (
                Arc::new(StaticAvailabilitySource::default()) as Arc<dyn AvailabilitySource>,
                Arc::new(StaticBoxLeague::default()) as Arc<dyn BoxLeagueSource>,
            )
        }
    };

    let booking = match site {
        Some(site) => site as Arc<dyn BookingGateway>,
        None => {
            info!("Bookings and cancellations are dry runs");
            Arc::new(DryRunBookingGateway)
        }
    };

    let chat = ChatManager::from_config(config)?.map(Arc::new);

    Ok(AgentServices {
        availability,
        booking,
        boxes,
        chat,
        deterministic: config.is_deterministic(),
    })
}
