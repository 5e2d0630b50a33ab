//! Weekday mentions and date resolution
//!
//! Weeks run Monday to Sunday. The booking site addresses days as
//! `dd MMM yy` (`20 Oct 26`).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WEEKDAY: Regex =
        Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap();
    static ref RELATIVE_DAY: Regex = Regex::new(r"(?i)\b(today|tonight|tomorrow)\b").unwrap();
}

/// Weekdays named in a prompt, in mention order, plus the week they refer to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayScope {
    pub days: Vec<Weekday>,
    pub this_week: bool,
    pub next_week: bool,
}

impl WeekdayScope {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// More than one day was asked for
    pub fn is_multi_day(&self) -> bool {
        self.days.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativeDay {
    Today,
    Tomorrow,
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    name.to_lowercase().parse().ok()
}

pub fn extract_weekdays_with_scope(prompt: &str) -> WeekdayScope {
    let mut days = Vec::new();
    for m in WEEKDAY.find_iter(prompt) {
        if let Some(day) = parse_weekday(m.as_str()) {
            if !days.contains(&day) {
                days.push(day);
            }
        }
    }

    let lower = prompt.to_lowercase();
    WeekdayScope {
        days,
        this_week: lower.contains("this week"),
        next_week: lower.contains("next week"),
    }
}

/// First of `today`/`tonight`/`tomorrow`; `tonight` counts as today
pub fn extract_relative_day(prompt: &str) -> Option<RelativeDay> {
    let m = RELATIVE_DAY.find(prompt)?;
    if m.as_str().eq_ignore_ascii_case("tomorrow") {
        Some(RelativeDay::Tomorrow)
    } else {
        Some(RelativeDay::Today)
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn resolve_weekday(day: Weekday, scope: &WeekdayScope, today: NaiveDate) -> NaiveDate {
    let offset = Duration::days(day.num_days_from_monday() as i64);
    if scope.next_week {
        monday_of(today) + Duration::days(7) + offset
    } else if scope.this_week {
        monday_of(today) + offset
    } else {
        let ahead = (7 + day.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            % 7;
        today + Duration::days(ahead)
    }
}

/// Concrete dates for a prompt. Named weekdays win over `today`/`tomorrow`;
/// an empty result means "the booking site's default day".
pub fn resolve_dates(
    scope: &WeekdayScope,
    relative: Option<RelativeDay>,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    if !scope.days.is_empty() {
        return scope
            .days
            .iter()
            .map(|day| resolve_weekday(*day, scope, today))
            .collect();
    }

    match relative {
        Some(RelativeDay::Today) => vec![today],
        Some(RelativeDay::Tomorrow) => vec![today + Duration::days(1)],
        None => Vec::new(),
    }
}

/// `20 Oct 26`
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%d %b %y").to_string()
}

/// `Tuesday 20 Oct`, used as a day label in multi-day answers
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%A %d %b").to_string()
}
