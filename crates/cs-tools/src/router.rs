//! Tools Router - HTTP endpoints for tool inspection and direct execution
//!
//! Mounted by the service at `/api/tools`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::registry::ToolRegistry;

/// Tools service state
#[derive(Clone)]
pub struct ToolsState {
    pub registry: Arc<ToolRegistry>,
}

impl ToolsState {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

/// Create the tools router
pub fn create_router(state: ToolsState) -> Router {
    Router::new()
        .route("/", get(list_tools_handler))
        .route("/:name", get(get_tool_handler))
        .route("/:name/execute", post(execute_tool_handler))
        .with_state(state)
}

/// Service info for the cs-http `ServiceRouter` trait
pub struct ToolsServiceRouter;

impl cs_http::router::ServiceRouter for ToolsServiceRouter {
    fn prefix() -> &'static str {
        "/api/tools"
    }

    fn name() -> &'static str {
        "tools"
    }

    fn description() -> &'static str {
        "Tool registry API endpoints"
    }
}

// === Handlers ===

async fn list_tools_handler(State(state): State<ToolsState>) -> impl IntoResponse {
    let tools = state.registry.list().await;
    let count = tools.len();

    Json(json!({
        "success": true,
        "tools": tools,
        "count": count,
        "deterministic": state.registry.is_deterministic(),
    }))
}

async fn get_tool_handler(
    State(state): State<ToolsState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&name).await {
        Some(tool) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "name": tool.name(),
                "description": tool.description(),
                "inputSchema": tool.input_schema()
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": format!("Tool not found: {}", name) })),
        ),
    }
}

async fn execute_tool_handler(
    State(state): State<ToolsState>,
    Path(name): Path<String>,
    Json(params): Json<Value>,
) -> impl IntoResponse {
    if state.registry.get(&name).await.is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": format!("Tool not found: {}", name) })),
        );
    }

    match state.registry.execute(&name, &params).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "success": true, "result": result })),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": e.to_string() })),
        ),
    }
}
