//! Per-request context
//!
//! Carries the caller identity and the reference date through every agent so
//! no component reaches for process-wide state.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Display name of the member making the request, if known
    pub user_id: Option<String>,
    /// Opaque session identifier, passed through untouched
    pub session_id: Option<String>,
    /// "Today" for date resolution and system prompts
    pub today: NaiveDate,
}

impl RequestContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            user_id: None,
            session_id: None,
            today,
        }
    }

    /// Context dated with the local calendar day
    pub fn now() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if !user_id.trim().is_empty() {
            self.user_id = Some(user_id);
        }
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::now()
    }
}
