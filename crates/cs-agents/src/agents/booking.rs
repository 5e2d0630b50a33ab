//! Booking and cancellation agents
//!
//! Both need a date and a start time. The time must be in the prompt; the
//! date defaults to today. Without a model the extracted values go straight
//! to the registry tool.

use anyhow::Result;
use async_trait::async_trait;
use cs_core::{AgentKind, ClockTime, RequestContext};
use cs_intent::{
    extract_any_time, extract_court_number, extract_player_name, extract_relative_day,
    extract_weekdays_with_scope, format_booking_date, resolve_dates,
};
use cs_tools::builtin::{BOOK_COURT, CANCEL_BOOKING};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::base::{apology, Agent};
use crate::prompts;
use crate::runtime::AgentRuntime;

/// Per-action wording and wiring
struct SlotAction {
    kind: AgentKind,
    tool: &'static str,
    role: &'static str,
    task: &'static str,
    missing_time: &'static str,
    with_player: bool,
}

const BOOK: SlotAction = SlotAction {
    kind: AgentKind::Booking,
    tool: BOOK_COURT,
    role: prompts::BOOKING,
    task: "book the court",
    missing_time: "What time would you like to play? Please include a start time such as 18:00 or 6pm.",
    with_player: true,
};

const CANCEL: SlotAction = SlotAction {
    kind: AgentKind::Cancellation,
    tool: CANCEL_BOOKING,
    role: prompts::CANCELLATION,
    task: "cancel the booking",
    missing_time: "Which booking should I cancel? Please include its start time such as 18:00 or 6pm.",
    with_player: false,
};

/// Tool arguments for the slot a prompt describes
fn slot_arguments(
    prompt: &str,
    ctx: &RequestContext,
    time: ClockTime,
    with_player: bool,
) -> Map<String, Value> {
    let scope = extract_weekdays_with_scope(prompt);
    let date = resolve_dates(&scope, extract_relative_day(prompt), ctx.today)
        .first()
        .copied()
        .unwrap_or(ctx.today);

    let mut args = Map::new();
    args.insert("date".to_string(), json!(format_booking_date(date)));
    args.insert("time".to_string(), json!(time.to_string()));
    if let Some(court) = extract_court_number(prompt) {
        args.insert("court".to_string(), json!(court));
    }
    if with_player {
        if let Some(player) = extract_player_name(prompt).or_else(|| ctx.user_id.clone()) {
            args.insert("player".to_string(), json!(player));
        }
    }
    args
}

async fn run_slot_action(
    action: &SlotAction,
    runtime: &AgentRuntime,
    prompt: &str,
    ctx: &RequestContext,
) -> Result<String> {
    let Some(time) = extract_any_time(prompt) else {
        info!("{} request without a start time", action.kind);
        return Ok(action.missing_time.to_string());
    };
    let args = Value::Object(slot_arguments(prompt, ctx, time, action.with_player));

    if !runtime.uses_model() {
        return runtime.call_tool(action.tool, args).await;
    }

    let system = format!(
        "{}\n\nDetails read from the message: {}",
        prompts::system_prompt(action.role, ctx),
        args
    );
    let outcome = runtime
        .run_tool_loop(&system, prompt, |call| call.result.clone())
        .await?;

    if outcome.text.is_empty() {
        return Ok(outcome.shaped_block());
    }
    Ok(outcome.text)
}

async fn handle_slot_action(
    action: &SlotAction,
    runtime: &AgentRuntime,
    prompt: &str,
    ctx: &RequestContext,
) -> String {
    match run_slot_action(action, runtime, prompt, ctx).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{} agent failed: {:#}", action.kind, e);
            apology(action.task, e)
        }
    }
}

pub struct BookingAgent {
    runtime: AgentRuntime,
}

impl BookingAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for BookingAgent {
    fn kind(&self) -> AgentKind {
        BOOK.kind
    }

    fn description(&self) -> &str {
        "Books a court for a given day and start time"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        handle_slot_action(&BOOK, &self.runtime, prompt, ctx).await
    }
}

pub struct CancellationAgent {
    runtime: AgentRuntime,
}

impl CancellationAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Agent for CancellationAgent {
    fn kind(&self) -> AgentKind {
        CANCEL.kind
    }

    fn description(&self) -> &str {
        "Cancels an existing court booking"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        handle_slot_action(&CANCEL, &self.runtime, prompt, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cs_core::SlotRequest;
    use cs_llm::{ChatManager, ScriptedProvider, ToolCallInfo};
    use cs_tools::builtin::{BookCourtTool, CancelBookingTool};
    use cs_tools::{BookingGateway, DryRunBookingGateway, ToolRegistry};
    use std::sync::Arc;

    struct DownGateway;

    #[async_trait]
    impl BookingGateway for DownGateway {
        async fn book(&self, _request: &SlotRequest) -> Result<String> {
            Err(anyhow::anyhow!("booking site unreachable"))
        }

        async fn cancel(&self, _request: &SlotRequest) -> Result<String> {
            Err(anyhow::anyhow!("booking site unreachable"))
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
    }

    async fn runtime(
        registry: ToolRegistry,
        gateway: Arc<dyn BookingGateway>,
        provider: Option<Arc<ScriptedProvider>>,
    ) -> AgentRuntime {
        registry.register(Arc::new(BookCourtTool::new(gateway.clone()))).await;
        registry.register(Arc::new(CancelBookingTool::new(gateway))).await;
        let chat = provider.map(|p| Arc::new(ChatManager::new(p, "m")));
        AgentRuntime::new(Arc::new(registry), chat)
    }

    #[test]
    fn test_slot_arguments() {
        let ctx = ctx().with_user("Dan Brown");
        let time = ClockTime::new(18, 0).unwrap();
        let args = slot_arguments("book court 3 on friday", &ctx, time, true);
        assert_eq!(args["date"], json!("23 Oct 26"));
        assert_eq!(args["time"], json!("18:00"));
        assert_eq!(args["court"], json!(3));
        assert_eq!(args["player"], json!("Dan Brown"));

        let args = slot_arguments("cancel tomorrow", &ctx, time, false);
        assert_eq!(args["date"], json!("21 Oct 26"));
        assert!(!args.contains_key("player"));
    }

    #[tokio::test]
    async fn test_book_directly_without_model() {
        let agent = BookingAgent::new(
            runtime(ToolRegistry::deterministic(), Arc::new(DryRunBookingGateway), None).await,
        );
        let text = agent
            .handle("Book me a court at 6pm tomorrow for Bob Jones", &ctx())
            .await;
        assert_eq!(text, "Dry run: would book 21 Oct 26 at 18:00 for Bob Jones");
    }

    #[tokio::test]
    async fn test_missing_time_asks() {
        let agent = CancellationAgent::new(
            runtime(ToolRegistry::deterministic(), Arc::new(DryRunBookingGateway), None).await,
        );
        let text = agent.handle("Cancel my booking tomorrow", &ctx()).await;
        assert!(text.starts_with("Which booking should I cancel?"));
    }

    #[tokio::test]
    async fn test_gateway_error_apologises() {
        let agent = BookingAgent::new(
            runtime(ToolRegistry::deterministic(), Arc::new(DownGateway), None).await,
        );
        let text = agent.handle("book court 2 at 19:00", &ctx()).await;
        assert_eq!(text, "Sorry, I couldn't book the court: booking site unreachable");
    }

    #[tokio::test]
    async fn test_model_books_through_tool() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .reply_tool_calls(vec![ToolCallInfo {
                    id: "b1".to_string(),
                    name: CANCEL_BOOKING.to_string(),
                    arguments: json!({"date": "20 Oct 26", "time": "19:00", "court": "2"}),
                }])
                .reply_text("Done, your 19:00 booking on Court 2 is cancelled."),
        );
        let agent = CancellationAgent::new(
            runtime(ToolRegistry::new(), Arc::new(DryRunBookingGateway), Some(provider.clone())).await,
        );
        let text = agent.handle("cancel court 2 at 7pm", &ctx()).await;
        assert_eq!(text, "Done, your 19:00 booking on Court 2 is cancelled.");

        let requests = provider.requests();
        assert!(requests[0].messages[0].content.contains("\"time\":\"19:00\""));
        let tool_result = requests[1].messages.iter().find(|m| m.role == "tool").unwrap();
        assert_eq!(tool_result.content, "Dry run: would cancel 20 Oct 26 at 19:00 on Court 2");
    }
}
