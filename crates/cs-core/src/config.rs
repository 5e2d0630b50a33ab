//! Environment Configuration Loader
//!
//! Loads `KEY=VALUE` pairs from the first environment file found and exposes a
//! typed [`CourtsideConfig`] built from the process environment.
//!
//! ## Usage
//!
//! ```no_run
//! use cs_core::config::{load_environment, CourtsideConfig};
//!
//! load_environment();
//! let config = CourtsideConfig::from_env();
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Paths checked in order when `COURTSIDE_ENV_FILE` is not set
pub const ENV_FILE_PATHS: &[&str] = &["/etc/courtside/environment", ".env"];

/// Load environment variables from the first configuration file found.
///
/// Existing environment variables are never overridden. Returns the path
/// that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("COURTSIDE_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded_path) = try_load_env_file(path) {
            return Some(loaded_path);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &str) -> Option<String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return None;
    }

    match fs::read_to_string(path_obj) {
        Ok(content) => {
            let mut loaded_count = 0;
            let mut skipped_count = 0;

            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = parse_env_line(line) {
                    if std::env::var(&key).is_err() {
                        std::env::set_var(&key, &value);
                        loaded_count += 1;
                        debug!("Loaded: {}={}", key, redact(&key, &value));
                    } else {
                        skipped_count += 1;
                        debug!("Skipped (already set): {}", key);
                    }
                }
            }

            info!(
                "Loaded {} environment variables from {} ({} skipped - already set)",
                loaded_count, path, skipped_count
            );

            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

fn redact<'a>(key: &str, value: &'a str) -> &'a str {
    if key.contains("KEY") || key.contains("TOKEN") || key.contains("SECRET") || key.contains("PASSWORD") {
        "***"
    } else {
        value
    }
}

/// Parse a single environment line into key-value pair.
fn parse_env_line(line: &str) -> Option<(String, String)> {
    // Handle: KEY=VALUE, KEY="VALUE", KEY='VALUE', export KEY=VALUE
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Get a configuration value with a default.
pub fn get_config(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional configuration value.
pub fn get_config_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get a boolean configuration value.
pub fn get_config_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

/// Get an integer configuration value.
pub fn get_config_int(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Which model backend to talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
    /// OpenAI Responses API run in background mode and polled to completion
    OpenAiResponses,
    /// No model: every agent answers from structured data only
    None,
}

impl LlmBackend {
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => LlmBackend::Anthropic,
            "openai" | "open_ai" | "azure" => LlmBackend::OpenAi,
            "openai_responses" | "openai-responses" | "responses" => LlmBackend::OpenAiResponses,
            _ => LlmBackend::None,
        }
    }
}

/// Typed service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtsideConfig {
    pub bind: String,
    pub llm_backend: LlmBackend,
    pub model: String,
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    /// Base URL of the booking-site proxy (availability, booking, boxes)
    pub booking_url: Option<String>,
    /// JSON fixture with availability snapshots, used instead of the proxy
    pub fixture: Option<PathBuf>,
    /// Force deterministic tool registries (no model phrasing)
    pub deterministic: bool,
    /// Milliseconds between polls of an asynchronous model run
    pub poll_interval_ms: u64,
}

impl CourtsideConfig {
    pub fn from_env() -> Self {
        let llm_backend = match get_config_opt("COURTSIDE_LLM_PROVIDER") {
            Some(value) => LlmBackend::from_str_lossy(&value),
            None if get_config_opt("ANTHROPIC_API_KEY").is_some() => LlmBackend::Anthropic,
            None if get_config_opt("OPENAI_API_KEY").is_some() => LlmBackend::OpenAi,
            None => LlmBackend::None,
        };

        let default_model = match llm_backend {
            LlmBackend::Anthropic => "claude-3-5-haiku-20241022",
            LlmBackend::OpenAi | LlmBackend::OpenAiResponses => "gpt-4o-mini",
            LlmBackend::None => "",
        };

        Self {
            bind: get_config("COURTSIDE_BIND", "0.0.0.0:8080"),
            llm_backend,
            model: get_config("COURTSIDE_MODEL", default_model),
            anthropic_api_key: get_config_opt("ANTHROPIC_API_KEY"),
            openai_api_key: get_config_opt("OPENAI_API_KEY"),
            openai_base_url: get_config_opt("OPENAI_BASE_URL"),
            booking_url: get_config_opt("COURTSIDE_BOOKING_URL"),
            fixture: get_config_opt("COURTSIDE_FIXTURE").map(PathBuf::from),
            deterministic: get_config_bool("COURTSIDE_DETERMINISTIC", false),
            poll_interval_ms: get_config_int("COURTSIDE_POLL_INTERVAL_MS", 1000).max(50) as u64,
        }
    }

    /// True when agents must answer without a model
    pub fn is_deterministic(&self) -> bool {
        self.deterministic || self.llm_backend == LlmBackend::None
    }
}
