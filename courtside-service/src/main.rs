//! courtside: squash club booking assistant
//!
//! One HTTP service in front of the agent pipeline:
//! - `/api/prompt` and the per-agent endpoints
//! - `/api/tools` for tool inspection and direct execution

use anyhow::Result;
use clap::Parser;
use cs_core::CourtsideConfig;
use cs_http::prelude::*;
use cs_tools::router::{ToolsServiceRouter, ToolsState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;
mod state;

use state::{build_services, AppState};

#[derive(Parser, Debug)]
#[command(name = "courtside")]
#[command(about = "Squash club booking assistant")]
struct Args {
    /// Bind address (host:port), overrides COURTSIDE_BIND
    #[arg(short, long)]
    bind: Option<String>,

    /// Offline JSON fixture, overrides COURTSIDE_FIXTURE
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Answer from structured data only, even with a model configured
    #[arg(long)]
    deterministic: bool,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,courtside=debug,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = cs_core::config::load_environment();
    let args = Args::parse();
    init_tracing(args.json_logs);

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path);
    }

    let mut config = CourtsideConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(fixture) = args.fixture {
        config.fixture = Some(fixture);
    }
    config.deterministic |= args.deterministic;

    let services = build_services(&config)?;
    let state = Arc::new(AppState::new(services).await);
    info!(
        "Agents ready (model: {}, deterministic: {})",
        state.model.as_deref().unwrap_or("none"),
        state.deterministic
    );

    let router = RouterBuilder::new()
        .service::<ToolsServiceRouter>(cs_tools::router::create_router(ToolsState::new(
            state.tools.clone(),
        )))
        .merge(handlers::create_router(state))
        .build();

    let server = HttpServer::builder()
        .bind(&config.bind)
        .router(router)
        .cors(!args.no_cors)
        .build()?;

    server.serve_with_shutdown(shutdown_signal()).await?;
    Ok(())
}
