//! HTTP handlers
//!
//! `/api/prompt` routes the prompt; the per-agent endpoints skip routing.
//! Every response body carries `success`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cs_chat::PromptOutcome;
use cs_core::{AgentKind, RequestContext};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::state::AppState;

type ApiResponse = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub prompt: String,
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

impl PromptRequest {
    fn context(&self) -> RequestContext {
        let session = self
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let ctx = RequestContext::now().with_session(session);
        match &self.user_id {
            Some(user) => ctx.with_user(user.as_str()),
            None => ctx,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/agents", get(agents_handler))
        .route("/api/prompt", post(prompt_handler))
        .route("/api/availability", post(availability_handler))
        .route("/api/booking", post(booking_handler))
        .route("/api/cancellation", post(cancellation_handler))
        .route("/api/box-positions", post(box_positions_handler))
        .route("/api/box-results", post(box_results_handler))
        .route("/api/stats", post(stats_handler))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    let message = message.into();
    warn!("Request rejected ({}): {}", status.as_u16(), message);
    (status, Json(json!({ "success": false, "error": message })))
}

fn outcome_response(outcome: PromptOutcome) -> ApiResponse {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "agent": outcome.agent,
            "message": outcome.message,
        })),
    )
}

/// Validate the body, then run it through the router or straight to `kind`
async fn answer(
    state: &AppState,
    kind: Option<AgentKind>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };

    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "prompt must not be empty");
    }

    let ctx = request.context();
    info!(
        session = ctx.session_id.as_deref().unwrap_or("-"),
        "Prompt: {} chars",
        prompt.len()
    );

    let outcome = match kind {
        Some(kind) => state.orchestrator.handle_with(kind, prompt, &ctx).await,
        None => state.orchestrator.handle(prompt, &ctx).await,
    };
    outcome_response(outcome)
}

async fn prompt_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, None, payload).await
}

async fn availability_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::CourtAvailability), payload).await
}

async fn booking_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::Booking), payload).await
}

async fn cancellation_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::Cancellation), payload).await
}

async fn box_positions_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::BoxPositions), payload).await
}

async fn box_results_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::BoxResults), payload).await
}

async fn stats_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> ApiResponse {
    answer(&state, Some(AgentKind::Stats), payload).await
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "healthy",
        "service": "courtside",
        "version": env!("CARGO_PKG_VERSION"),
        "agents": state.orchestrator.agents().kinds().await,
        "tools": state.tools.len().await,
        "model": state.model,
        "deterministic": state.deterministic,
    }))
}

async fn agents_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let agents = state.orchestrator.agents().descriptors().await;
    Json(json!({ "success": true, "agents": agents, "count": agents.len() }))
}
