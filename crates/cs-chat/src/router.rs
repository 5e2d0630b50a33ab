//! Primary router
//!
//! Ordered keyword rules first, first match wins. Only prompts no rule
//! recognises are sent to the model, which must answer with one label.

use anyhow::Result;
use cs_agents::prompts;
use cs_core::AgentKind;
use cs_llm::ChatManager;
use std::sync::Arc;
use tracing::{debug, info, warn};

const BOOK_VERBS: &[&str] = &["book", "reserve", "grab"];
const CANCEL_WORDS: &[&str] = &["cancel", "delete", "remove"];
const RESULT_WORDS: &[&str] = &["result", "score"];
const POSITION_WORDS: &[&str] = &["position", "standing", "table", "ladder", "league"];
const AVAILABILITY_WORDS: &[&str] = &["available", "availability", "free", "open", "slot"];
const WHO_WORDS: &[&str] = &["who", "whos", "who's"];
const STATS_WORDS: &[&str] = &[
    "stats",
    "statistic",
    "report",
    "analytics",
    "utilisation",
    "utilization",
];

/// Lowercase words; apostrophes stay so "who's" is one token
fn tokenize(prompt: &str) -> Vec<String> {
    prompt
        .to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\'').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn has_word(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(&t.as_str()))
}

/// Any token starting with one of `stems` ("results", "standings")
fn has_stem(tokens: &[String], stems: &[&str]) -> bool {
    tokens
        .iter()
        .any(|t| stems.iter().any(|s| t.starts_with(s)))
}

fn asks_who_is_playing(tokens: &[String]) -> bool {
    tokens
        .iter()
        .position(|t| WHO_WORDS.contains(&t.as_str()))
        .map(|i| tokens[i + 1..].iter().any(|t| t == "playing"))
        .unwrap_or(false)
}

/// Keyword rules only; `None` when nothing matches
pub fn keyword_route(prompt: &str) -> Option<AgentKind> {
    let tokens = tokenize(prompt);
    let court = has_stem(&tokens, &["court"]);
    let boxes = has_word(&tokens, &["box", "boxes"]);

    if has_word(&tokens, BOOK_VERBS) && court {
        Some(AgentKind::Booking)
    } else if has_stem(&tokens, CANCEL_WORDS) {
        Some(AgentKind::Cancellation)
    } else if boxes && has_stem(&tokens, RESULT_WORDS) {
        Some(AgentKind::BoxResults)
    } else if boxes && has_stem(&tokens, POSITION_WORDS) {
        Some(AgentKind::BoxPositions)
    } else if (court && has_stem(&tokens, AVAILABILITY_WORDS)) || asks_who_is_playing(&tokens) {
        Some(AgentKind::CourtAvailability)
    } else if has_stem(&tokens, STATS_WORDS) {
        Some(AgentKind::Stats)
    } else {
        None
    }
}

fn classification_prompt() -> String {
    let labels: Vec<&str> = AgentKind::ALL.iter().map(|k| k.as_str()).collect();
    format!(
        "{}\nAnswer with exactly one of these labels and nothing else: {}.",
        prompts::ROUTER,
        labels.join(", ")
    )
}

pub struct PrimaryRouter {
    chat: Option<Arc<ChatManager>>,
}

impl PrimaryRouter {
    pub fn new(chat: Option<Arc<ChatManager>>) -> Self {
        Self { chat }
    }

    /// Keyword-only router
    pub fn keywords_only() -> Self {
        Self::new(None)
    }

    pub async fn route(&self, prompt: &str) -> AgentKind {
        if let Some(kind) = keyword_route(prompt) {
            debug!("Keyword route: {}", kind);
            return kind;
        }

        let Some(chat) = &self.chat else {
            return AgentKind::CourtAvailability;
        };

        match classify(chat, prompt).await {
            Ok(kind) => {
                info!("Model route: {}", kind);
                kind
            }
            Err(e) => {
                warn!("Classification failed, defaulting to court_availability: {:#}", e);
                AgentKind::CourtAvailability
            }
        }
    }
}

async fn classify(chat: &ChatManager, prompt: &str) -> Result<AgentKind> {
    let completion = chat.complete(&classification_prompt(), prompt, Vec::new()).await?;
    completion
        .text
        .parse::<AgentKind>()
        .map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_llm::ScriptedProvider;

    fn router(provider: ScriptedProvider) -> (PrimaryRouter, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let chat = Arc::new(ChatManager::new(provider.clone(), "m"));
        (PrimaryRouter::new(Some(chat)), provider)
    }

    #[test]
    fn test_keyword_rules() {
        assert_eq!(keyword_route("Book me a court at 6pm"), Some(AgentKind::Booking));
        assert_eq!(keyword_route("Cancel my booking tomorrow"), Some(AgentKind::Cancellation));
        assert_eq!(keyword_route("box 3 results please"), Some(AgentKind::BoxResults));
        assert_eq!(keyword_route("Show me the box standings"), Some(AgentKind::BoxPositions));
        assert_eq!(keyword_route("Any courts free tonight?"), Some(AgentKind::CourtAvailability));
        assert_eq!(keyword_route("Who's playing at 7?"), Some(AgentKind::CourtAvailability));
        assert_eq!(keyword_route("court utilisation report"), Some(AgentKind::Stats));
        assert_eq!(keyword_route("hello there"), None);
    }

    #[test]
    fn test_rule_order() {
        // book needs "court", so this is a cancellation
        assert_eq!(keyword_route("remove my booking"), Some(AgentKind::Cancellation));
        // "booking" is not the verb
        assert_eq!(keyword_route("is my booking on court 2 open?"), Some(AgentKind::CourtAvailability));
        assert_eq!(keyword_route("who is playing in box 2"), Some(AgentKind::CourtAvailability));
    }

    #[tokio::test]
    async fn test_keyword_match_skips_model() {
        let (router, provider) = router(ScriptedProvider::new().reply_text("stats"));
        assert_eq!(router.route("Book me a court at 6pm").await, AgentKind::Booking);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_model_classifies_unmatched() {
        let (router, provider) = router(ScriptedProvider::new().reply_text(" Box_Results. "));
        assert_eq!(router.route("how did Alice get on last week").await, AgentKind::BoxResults);
        let system = provider.requests()[0].system_prompt().unwrap_or_default().to_string();
        assert!(system.contains("court_availability, booking"));
    }

    #[tokio::test]
    async fn test_failures_default_to_availability() {
        let (router, _) = router(ScriptedProvider::new().reply_error("model down"));
        assert_eq!(router.route("hello there").await, AgentKind::CourtAvailability);

        let (router, _) = self::router(ScriptedProvider::new().reply_text("weather"));
        assert_eq!(router.route("hello there").await, AgentKind::CourtAvailability);

        let router = PrimaryRouter::keywords_only();
        assert_eq!(router.route("hello there").await, AgentKind::CourtAvailability);
    }
}
