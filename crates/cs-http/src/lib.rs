//! cs-http: HTTP server for courtside
//!
//! Service crates export routers; this crate composes them and applies one
//! middleware stack.
//!
//! ```text
//! courtside-service binary
//!     └── cs-http (this crate)
//!         ├── Middleware stack (CORS, tracing, timeout, request logging)
//!         └── Router composition
//!             ├── /api/*        → courtside-service handlers
//!             └── /api/tools/*  → cs_tools::router::create_router()
//! ```

pub mod middleware;
pub mod router;
pub mod server;

pub use middleware::{MiddlewareConfig, MiddlewareStack};
pub use router::{RouterBuilder, ServiceRouter};
pub use server::{HttpServer, HttpServerBuilder, ServerConfig};

pub use axum;

/// Error types for the HTTP server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server binding error: {0}")]
    BindError(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Prelude for convenient imports by other crates
pub mod prelude {
    pub use super::axum::{
        extract::{Json, Path, State},
        response::{IntoResponse, Response},
        routing::{get, post},
        Router,
    };
    pub use super::middleware::{MiddlewareConfig, MiddlewareStack};
    pub use super::router::{RouterBuilder, ServiceRouter};
    pub use super::server::{HttpServer, HttpServerBuilder, ServerConfig};
    pub use super::Result;
}
