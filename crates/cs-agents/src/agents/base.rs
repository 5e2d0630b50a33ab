//! Base agent trait

use async_trait::async_trait;
use cs_core::{AgentKind, RequestContext};
use std::fmt::Display;
use std::sync::Arc;

/// A domain handler for one kind of prompt
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Routing label, e.g. `court_availability`
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn description(&self) -> &str;

    /// Answer the prompt. Never fails: errors come back as an apology.
    async fn handle(&self, prompt: &str, ctx: &RequestContext) -> String;
}

pub type BoxedAgent = Arc<dyn Agent>;

/// `Sorry, I couldn't <task>: <message>`
pub fn apology(task: &str, err: impl Display) -> String {
    format!("Sorry, I couldn't {}: {}", task, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apology() {
        assert_eq!(
            apology("book the court", "site is down"),
            "Sorry, I couldn't book the court: site is down"
        );
    }
}
