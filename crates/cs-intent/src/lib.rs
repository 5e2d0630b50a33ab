//! Intent extraction for booking prompts
//!
//! Pure regex and keyword heuristics over the raw prompt text. Nothing here
//! calls a model; agents use these results to decide whether a prompt can be
//! answered deterministically.

pub mod dates;
pub mod intents;
pub mod player;
pub mod time;

pub use dates::{
    extract_relative_day, extract_weekdays_with_scope, format_booking_date, format_day_label,
    resolve_dates, RelativeDay, WeekdayScope,
};
pub use intents::{detect_intents, extract_box_number, extract_court_number, Intents};
pub use player::extract_player_name;
pub use time::{
    extract_any_time, extract_evening_time_range, extract_specific_time, extract_time_range,
};
