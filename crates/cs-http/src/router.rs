//! Router Composition
//!
//! Each crate that exposes HTTP routes implements ServiceRouter and provides
//! a `create_router(state)` function; the binary nests them here.

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use serde_json::json;
use tracing::info;

/// Trait for crates that provide HTTP routes
///
/// ```ignore
/// pub struct ToolsServiceRouter;
///
/// impl ServiceRouter for ToolsServiceRouter {
///     fn prefix() -> &'static str {
///         "/api/tools"
///     }
///
///     fn name() -> &'static str {
///         "tools"
///     }
/// }
/// ```
pub trait ServiceRouter: Send + Sync {
    /// The URL prefix for this service (e.g., "/api/tools")
    fn prefix() -> &'static str;

    /// Service name for logging
    fn name() -> &'static str;

    fn description() -> &'static str {
        ""
    }
}

/// Builder for composing multiple service routers
pub struct RouterBuilder {
    router: Router,
    services: Vec<(&'static str, &'static str)>, // (prefix, name)
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            services: Vec::new(),
        }
    }

    /// Add a router at a specific prefix
    pub fn nest(mut self, prefix: &'static str, name: &'static str, router: Router) -> Self {
        info!("Mounting service '{}' at {}", name, prefix);
        self.router = self.router.nest(prefix, router);
        self.services.push((prefix, name));
        self
    }

    /// Mount a ServiceRouter implementation at its own prefix
    pub fn service<S: ServiceRouter>(self, router: Router) -> Self {
        self.nest(S::prefix(), S::name(), router)
    }

    /// Add a route directly to the root router
    pub fn route(mut self, path: &str, method_router: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Merge another router (no prefix)
    pub fn merge(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Get list of mounted services
    pub fn services(&self) -> &[(&'static str, &'static str)] {
        &self.services
    }

    /// Build the final router; unknown paths answer with a JSON 404
    pub fn build(self) -> Router {
        self.router.fallback(not_found)
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Not found" })),
    )
}

/// Convenience function to create a router builder
pub fn router() -> RouterBuilder {
    RouterBuilder::new()
}
