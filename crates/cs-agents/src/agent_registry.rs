//! Agent Registry
//!
//! One agent per `AgentKind`; registering a kind again replaces the agent.

use cs_core::AgentKind;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::agents::BoxedAgent;

/// Name and description of a registered agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDescriptor {
    pub kind: AgentKind,
    pub name: String,
    pub description: String,
}

pub struct AgentRegistry {
    agents: RwLock<HashMap<AgentKind, BoxedAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, agent: BoxedAgent) {
        let kind = agent.kind();
        if self.agents.write().await.insert(kind, agent).is_some() {
            warn!("Replaced agent '{}'", kind);
        } else {
            info!("Registered agent '{}'", kind);
        }
    }

    pub async fn get(&self, kind: AgentKind) -> Option<BoxedAgent> {
        self.agents.read().await.get(&kind).cloned()
    }

    /// Registered kinds in declaration order
    pub async fn kinds(&self) -> Vec<AgentKind> {
        let agents = self.agents.read().await;
        AgentKind::ALL
            .into_iter()
            .filter(|k| agents.contains_key(k))
            .collect()
    }

    pub async fn descriptors(&self) -> Vec<AgentDescriptor> {
        let agents = self.agents.read().await;
        AgentKind::ALL
            .into_iter()
            .filter_map(|k| agents.get(&k))
            .map(|agent| AgentDescriptor {
                kind: agent.kind(),
                name: agent.name().to_string(),
                description: agent.description().to_string(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use async_trait::async_trait;
    use cs_core::RequestContext;
    use std::sync::Arc;

    struct Fixed(AgentKind, &'static str);

    #[async_trait]
    impl Agent for Fixed {
        fn kind(&self) -> AgentKind {
            self.0
        }

        fn description(&self) -> &str {
            "fixed reply"
        }

        async fn handle(&self, _prompt: &str, _ctx: &RequestContext) -> String {
            self.1.to_string()
        }
    }

    #[tokio::test]
    async fn test_register_replaces_by_kind() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(Fixed(AgentKind::Stats, "a"))).await;
        registry.register(Arc::new(Fixed(AgentKind::Booking, "b"))).await;
        registry.register(Arc::new(Fixed(AgentKind::Stats, "c"))).await;

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.kinds().await, vec![AgentKind::Booking, AgentKind::Stats]);
        let agent = registry.get(AgentKind::Stats).await.unwrap();
        assert_eq!(agent.handle("x", &RequestContext::default()).await, "c");
        assert!(registry.get(AgentKind::BoxResults).await.is_none());
        assert_eq!(registry.descriptors().await[0].name, "booking");
    }
}
