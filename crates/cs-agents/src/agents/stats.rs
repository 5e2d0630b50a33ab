//! Court utilisation report agent

use anyhow::Result;
use async_trait::async_trait;
use cs_core::{AgentKind, RequestContext};
use cs_intent::{
    extract_court_number, extract_relative_day, extract_weekdays_with_scope, format_booking_date,
    resolve_dates,
};
use cs_shaper::{filter_by_court, render_stats, summarize};
use cs_tools::builtin::GET_COURT_AVAILABILITY;
use tracing::{info, warn};

use super::base::{apology, Agent};
use crate::runtime::AgentRuntime;

/// Deterministic report; the model is never asked to reword numbers
pub struct StatsAgent {
    runtime: AgentRuntime,
}

impl StatsAgent {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }

    async fn answer(&self, prompt: &str, ctx: &RequestContext) -> Result<String> {
        let scope = extract_weekdays_with_scope(prompt);
        let dates = resolve_dates(&scope, extract_relative_day(prompt), ctx.today);
        let labels: Vec<Option<String>> = if dates.is_empty() {
            vec![None]
        } else {
            dates.into_iter().map(|d| Some(format_booking_date(d))).collect()
        };
        let court = extract_court_number(prompt);

        let mut reports = Vec::with_capacity(labels.len());
        for label in labels {
            let mut snapshot = self
                .runtime
                .fetch_snapshot(GET_COURT_AVAILABILITY, label.as_deref())
                .await?;
            if let Some(n) = court {
                snapshot = filter_by_court(&snapshot, n);
            }
            let stats = summarize(&snapshot);
            info!(
                "Utilisation for {}: {}/{} booked",
                stats.date, stats.booked, stats.total
            );
            reports.push(render_stats(&stats));
        }
        Ok(reports.join("\n\n"))
    }
}

#[async_trait]
impl Agent for StatsAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Stats
    }

    fn description(&self) -> &str {
        "Reports how busy the courts are"
    }

    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String {
        match self.answer(prompt, ctx).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Stats agent failed: {:#}", e);
                apology("build the court report", e)
            }
        }
    }
}
