//! Core types and utilities for courtside
//!
//! # Modules
//!
//! - `config`: Environment loading and typed configuration
//! - `context`: Per-request context passed explicitly through agents
//! - `error`: Error types and Result alias
//! - `time`: Clock times and booking time slots
//! - `types`: Availability snapshot model, tool call records, agent kinds

pub mod config;
pub mod context;
pub mod error;
pub mod time;
pub mod types;

// Re-exports
pub use config::CourtsideConfig;
pub use context::RequestContext;
pub use error::{Error, Result};
pub use time::{ClockTime, TimeRange, TimeSlot};
pub use types::*;
