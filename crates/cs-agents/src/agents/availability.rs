//! Court availability agent
//!
//! Flow for one prompt: extract intents, fetch the raw day(s), filter,
//! render the structured block, then either return it or let the model
//! reword it. The block wins whenever the model is unavailable, fails, or
//! drops the court names.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use cs_core::{AgentKind, AvailabilitySnapshot, RequestContext, ToolCall};
use cs_intent::{
    detect_intents, extract_court_number, extract_player_name, extract_relative_day,
    extract_evening_time_range, extract_specific_time, extract_time_range,
    extract_weekdays_with_scope, format_booking_date, format_day_label, resolve_dates, Intents,
    WeekdayScope,
};
use cs_shaper::{build_multi_day_block, build_structured_block, AvailabilityFilter, NO_MATCH_MESSAGE};
use cs_tools::builtin::GET_COURT_AVAILABILITY;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::base::{apology, Agent};
use crate::prompts;
use crate::runtime::AgentRuntime;

/// Phrase every faithful rewording keeps
const COURT_MARKER: &str = "Court ";

/// Everything the extractors found in one prompt
#[derive(Debug, Clone)]
struct AvailabilityQuery {
    scope: WeekdayScope,
    intents: Intents,
    dates: Vec<NaiveDate>,
    filter: AvailabilityFilter,
    has_player: bool,
}

impl AvailabilityQuery {
    fn parse(prompt: &str, ctx: &RequestContext) -> Self {
        let scope = extract_weekdays_with_scope(prompt);
        let intents = detect_intents(prompt);
        let dates = resolve_dates(&scope, extract_relative_day(prompt), ctx.today);

        let mut player = extract_player_name(prompt);
        if player.is_none() && intents.what_court_am_i_on {
            player = ctx.user_id.clone();
        }

        let range = if intents.tonight {
            extract_evening_time_range(prompt)
        } else {
            extract_time_range(prompt)
        };
        let filter = AvailabilityFilter::new()
            .range(range)
            .at(extract_specific_time(prompt))
            .evening(intents.tonight)
            .player(player)
            .booked_only(intents.booked_only || intents.who_is_playing)
            .available_only(intents.available_only)
            .court(extract_court_number(prompt));

        Self {
            has_player: filter.player.is_some(),
            scope,
            intents,
            dates,
            filter,
        }
    }

    /// Local extraction is enough to answer without model tool selection
    fn is_deterministic(&self) -> bool {
        !self.scope.is_empty() || self.intents.any() || self.has_player || !self.filter.is_empty()
    }
}

pub struct CourtAvailabilityAgent {
    runtime: AgentRuntime,
}

impl CourtAvailabilityAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }

    async fn fetch(&self, date: Option<NaiveDate>) -> Result<AvailabilitySnapshot> {
        let label = date.map(format_booking_date);
        self.runtime
            .fetch_snapshot(GET_COURT_AVAILABILITY, label.as_deref())
            .await
    }

    /// Structured answer straight from the registry tool
    async fn structured_answer(&self, query: &AvailabilityQuery) -> Result<String> {
        if query.dates.len() > 1 {
            let snapshots = try_join_all(query.dates.iter().map(|d| self.fetch(Some(*d)))).await?;
            let sections: Vec<(String, AvailabilitySnapshot)> = query
                .dates
                .iter()
                .zip(snapshots)
                .map(|(date, snapshot)| (format_day_label(*date), query.filter.apply(&snapshot)))
                .collect();
            debug!("Rendering {} days", sections.len());
            return Ok(build_multi_day_block(&sections));
        }

        let snapshot = self.fetch(query.dates.first().copied()).await?;
        let shaped = query.filter.apply(&snapshot);
        debug!(
            "Shaped {} -> {} cells for {}",
            snapshot.cell_count(),
            shaped.cell_count(),
            snapshot.date
        );
        Ok(build_structured_block(&shaped))
    }

    /// Let the model reword `block`, keeping the block when it cannot
    async fn phrase(&self, prompt: &str, ctx: &RequestContext, block: String) -> String {
        if block.is_empty() || !self.runtime.uses_model() {
            return block;
        }
        let system = prompts::system_prompt(prompts::COURT_AVAILABILITY, ctx);
        match self.runtime.rephrase(&system, prompt, &block).await {
            Ok(text) if keeps_courts(&text, &block) => text,
            Ok(_) => {
                warn!("Rephrased answer dropped court names, returning structured block");
                block
            }
            Err(e) => {
                warn!("Rephrasing failed, returning structured block: {}", e);
                block
            }
        }
    }

    async fn answer(&self, prompt: &str, ctx: &RequestContext) -> Result<String> {
        let query = AvailabilityQuery::parse(prompt, ctx);

        if query.is_deterministic() || !self.runtime.uses_model() {
            info!("Availability shortcut: dates={:?}, filter={:?}", query.dates, query.filter);
            let block = self.structured_answer(&query).await?;
            if block.is_empty() {
                return Ok(NO_MATCH_MESSAGE.to_string());
            }
            return Ok(self.phrase(prompt, ctx, block).await);
        }

        let system = prompts::system_prompt(prompts::COURT_AVAILABILITY, ctx);
        let filter = query.filter.clone();
        let outcome = self
            .runtime
            .run_tool_loop(&system, prompt, |call| shape_tool_result(call, &filter))
            .await?;

        let block = outcome.shaped_block();
        if outcome.text.is_empty() {
            return Ok(if block.is_empty() {
                NO_MATCH_MESSAGE.to_string()
            } else {
                block
            });
        }
        if !keeps_courts(&outcome.text, &block) {
            warn!("Model answer dropped court names, returning structured block");
            return Ok(block);
        }
        Ok(outcome.text)
    }
}

fn keeps_courts(text: &str, block: &str) -> bool {
    !text.trim().is_empty() && (block.is_empty() || text.contains(COURT_MARKER))
}

/// Availability JSON from the model's own tool call, filtered and rendered
fn shape_tool_result(call: &ToolCall, filter: &AvailabilityFilter) -> String {
    if call.tool_name != GET_COURT_AVAILABILITY {
        return call.result.clone();
    }
    match serde_json::from_str::<AvailabilitySnapshot>(&call.result) {
        Ok(snapshot) => {
            let block = build_structured_block(&filter.apply(&snapshot));
            if block.is_empty() {
                NO_MATCH_MESSAGE.to_string()
            } else {
                block
            }
        }
        Err(_) => call.result.clone(),
    }
}

#[async_trait]
impl Agent for CourtAvailabilityAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::CourtAvailability
    }

    fn description(&self) -> &str {
        "Answers which courts are free or booked, and who is playing when"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        match self.answer(prompt, ctx).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Availability agent failed: {:#}", e);
                apology("check court availability", e)
            }
        }
    }
}
