//! Courtside data shaper
//!
//! Pure transforms that turn a raw availability snapshot or box league text
//! into the answer a member sees:
//! - `filter`: time, player, booking-state and court filters
//! - `render`: structured text blocks for one or several days
//! - `standings`: medal ranking and name highlighting for box tables
//! - `stats`: court utilisation summary

pub mod filter;
pub mod render;
pub mod standings;
pub mod stats;

pub use filter::{
    filter_available_only, filter_booked_only, filter_by_court, filter_by_player,
    filter_by_range, filter_by_time, filter_from, prune_empty_courts, AvailabilityFilter,
    EVENING_START,
};
pub use render::{build_multi_day_block, build_structured_block, NO_MATCH_MESSAGE};
pub use standings::{decorate, decorate_standings, highlight_player};
pub use stats::{render_stats, summarize, AvailabilityStats, CourtUsage};
