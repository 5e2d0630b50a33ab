//! Box league agents
//!
//! Tool output and model replies both pass through the standings decorator,
//! which re-ranks tables and bolds the member's own name.

use anyhow::Result;
use async_trait::async_trait;
use cs_core::{AgentKind, RequestContext};
use cs_intent::{extract_box_number, extract_player_name};
use cs_shaper::decorate;
use cs_tools::builtin::{GET_BOX_POSITIONS, GET_BOX_RESULTS};
use serde_json::json;
use tracing::warn;

use super::base::{apology, Agent};
use crate::prompts;
use crate::runtime::AgentRuntime;

struct BoxQuery {
    kind: AgentKind,
    tool: &'static str,
    role: &'static str,
    task: &'static str,
}

const POSITIONS: BoxQuery = BoxQuery {
    kind: AgentKind::BoxPositions,
    tool: GET_BOX_POSITIONS,
    role: prompts::BOX_POSITIONS,
    task: "get the box league positions",
};

const RESULTS: BoxQuery = BoxQuery {
    kind: AgentKind::BoxResults,
    tool: GET_BOX_RESULTS,
    role: prompts::BOX_RESULTS,
    task: "get the box league results",
};

async fn run_box_query(
    query: &BoxQuery,
    runtime: &AgentRuntime,
    prompt: &str,
    ctx: &RequestContext,
) -> Result<String> {
    let player = extract_player_name(prompt).or_else(|| ctx.user_id.clone());
    let player = player.as_deref();

    if !runtime.uses_model() {
        let args = match extract_box_number(prompt) {
            Some(n) => json!({ "box": n }),
            None => json!({}),
        };
        let text = runtime.call_tool(query.tool, args).await?;
        return Ok(decorate(&text, player));
    }

    let system = prompts::system_prompt(query.role, ctx);
    let outcome = runtime
        .run_tool_loop(&system, prompt, |call| decorate(&call.result, player))
        .await?;

    let text = if outcome.text.is_empty() {
        outcome.shaped_block()
    } else {
        outcome.text
    };
    Ok(decorate(&text, player))
}

async fn handle_box_query(
    query: &BoxQuery,
    runtime: &AgentRuntime,
    prompt: &str,
    ctx: &RequestContext,
) -> String {
    match run_box_query(query, runtime, prompt, ctx).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{} agent failed: {:#}", query.kind, e);
            apology(query.task, e)
        }
    }
}

pub struct BoxPositionsAgent {
    runtime: AgentRuntime,
}

impl BoxPositionsAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for BoxPositionsAgent {
    fn kind(&self) -> AgentKind {
        POSITIONS.kind
    }

    fn description(&self) -> &str {
        "Shows box league tables, ranked with medals"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        handle_box_query(&POSITIONS, &self.runtime, prompt, ctx).await
    }
}

pub struct BoxResultsAgent {
    runtime: AgentRuntime,
}

impl BoxResultsAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for BoxResultsAgent {
    fn kind(&self) -> AgentKind {
        RESULTS.kind
    }

    fn description(&self) -> &str {
        "Shows recent box league match results"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        handle_box_query(&RESULTS, &self.runtime, prompt, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cs_core::{BoxResult, BoxTable, PlayerStanding};
    use cs_llm::{ChatManager, ScriptedProvider, ToolCallInfo};
    use cs_tools::builtin::{GetBoxPositionsTool, GetBoxResultsTool};
    use cs_tools::{StaticBoxLeague, ToolRegistry};
    use std::sync::Arc;

    fn standing(name: &str, played: u32, won: u32, points: u32) -> PlayerStanding {
        PlayerStanding {
            name: name.to_string(),
            played,
            won,
            lost: played - won,
            points,
        }
    }

    fn league() -> StaticBoxLeague {
        StaticBoxLeague::new(
            vec![
                BoxTable {
                    name: "Box 1".to_string(),
                    players: vec![
                        standing("Bob Jones", 3, 1, 4),
                        standing("Alice Smith", 3, 3, 9),
                        standing("Carol White", 3, 2, 6),
                        standing("Dan Brown", 3, 0, 1),
                    ],
                },
                BoxTable {
                    name: "Box 2".to_string(),
                    players: vec![standing("Eve Black", 1, 1, 3)],
                },
            ],
            vec![BoxResult {
                box_name: "Box 1".to_string(),
                winner: "Alice Smith".to_string(),
                loser: "Bob Jones".to_string(),
                score: "3-1".to_string(),
            }],
        )
    }

    async fn runtime(registry: ToolRegistry, provider: Option<Arc<ScriptedProvider>>) -> AgentRuntime {
        let source = Arc::new(league());
        registry.register(Arc::new(GetBoxPositionsTool::new(source.clone()))).await;
        registry.register(Arc::new(GetBoxResultsTool::new(source))).await;
        let chat = provider.map(|p| Arc::new(ChatManager::new(p, "m")));
        AgentRuntime::new(Arc::new(registry), chat)
    }

    fn ctx() -> RequestContext {
        RequestContext::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
    }

    #[tokio::test]
    async fn test_positions_ranked_and_highlighted() {
        let agent = BoxPositionsAgent::new(runtime(ToolRegistry::deterministic(), None).await);
        let text = agent
            .handle("Box 1 standings please", &ctx().with_user("Bob Jones"))
            .await;
        assert_eq!(
            text,
            "Box 1\n\
             1. 🥇 Alice Smith - Played: 3, Won: 3, Lost: 0, Points: 9\n\
             2. 🥈 Carol White - Played: 3, Won: 2, Lost: 1, Points: 6\n\
             3. 🥉 **Bob Jones** - Played: 3, Won: 1, Lost: 2, Points: 4\n\
             4. 🥄 Dan Brown - Played: 3, Won: 0, Lost: 3, Points: 1"
        );
    }

    #[tokio::test]
    async fn test_results_highlight_member() {
        let agent = BoxResultsAgent::new(runtime(ToolRegistry::deterministic(), None).await);
        let text = agent
            .handle("latest box results", &ctx().with_user("Alice Smith"))
            .await;
        assert_eq!(text, "Box 1\n**Alice Smith** beat Bob Jones 3-1");
    }

    #[tokio::test]
    async fn test_model_reply_is_decorated() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .reply_tool_calls(vec![ToolCallInfo {
                    id: "p1".to_string(),
                    name: GET_BOX_POSITIONS.to_string(),
                    arguments: json!({"box": 2}),
                }])
                .reply_text("Box 2\nEve Black - Played: 1, Won: 1, Points: 3"),
        );
        let agent = BoxPositionsAgent::new(runtime(ToolRegistry::new(), Some(provider)).await);
        let text = agent.handle("how is Eve Black doing in box 2", &ctx()).await;
        assert_eq!(text, "Box 2\n1. 🥇 **Eve Black** - Played: 1, Won: 1, Points: 3");
    }
}
