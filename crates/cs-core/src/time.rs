//! Clock times and booking time slots
//!
//! The booking site renders every cell with a `"HH:MM - HH:MM"` label. These
//! types turn those labels into comparable values so filters never touch raw
//! strings.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A wall-clock time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build from hour and minute, rejecting out-of-range values
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ClockTime)
    }

    /// Parse `H:MM` or `HH:MM`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| Error::InvalidTime(trimmed.to_string()))?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(Error::InvalidTime(trimmed.to_string()));
        }
        let hour: u32 = h.parse().map_err(|_| Error::InvalidTime(trimmed.to_string()))?;
        let minute: u32 = m.parse().map_err(|_| Error::InvalidTime(trimmed.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| Error::InvalidTime(trimmed.to_string()))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight
    pub fn minutes(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Shift forward by whole hours; `None` if that crosses midnight
    pub fn add_hours(&self, hours: u32) -> Option<Self> {
        Self::new(self.hour() + hours, self.minute())
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(value: NaiveTime) -> Self {
        ClockTime(NaiveTime::from_hms_opt(value.hour(), value.minute(), 0).unwrap_or(value))
    }
}

/// A bookable slot with `start < end`, never crossing midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidSlot(format!("{} - {}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Parse `"HH:MM - HH:MM"`; the separator may be a hyphen or an en dash
    /// with or without surrounding spaces.
    pub fn parse(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        let (start, end) = trimmed
            .split_once(['-', '–'])
            .ok_or_else(|| Error::InvalidSlot(trimmed.to_string()))?;
        let start = ClockTime::parse(start).map_err(|_| Error::InvalidSlot(trimmed.to_string()))?;
        let end = ClockTime::parse(end).map_err(|_| Error::InvalidSlot(trimmed.to_string()))?;
        Self::new(start, end)
    }

    /// Inclusive containment: `start <= t <= end`
    pub fn contains(&self, t: ClockTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Inclusive overlap with `[from, to]`
    pub fn overlaps(&self, range: &TimeRange) -> bool {
        self.start <= range.end && self.end >= range.start
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl FromStr for TimeSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A normalized window `[start, end]` requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(t("6:05").to_string(), "06:05");
        assert_eq!(t("18:45").minutes(), 18 * 60 + 45);
        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::parse("1845").is_err());
        assert!(ClockTime::parse("18:5").is_err());
    }

    #[test]
    fn test_add_hours_stays_within_day() {
        assert_eq!(t("7:00").add_hours(12), Some(t("19:00")));
        assert_eq!(t("13:00").add_hours(12), None);
    }

    #[test]
    fn test_slot_parse_variants() {
        let slot = TimeSlot::parse("18:15 - 19:00").unwrap();
        assert_eq!(slot.start, t("18:15"));
        assert_eq!(slot.end, t("19:00"));

        assert_eq!(TimeSlot::parse("7:00-7:45").unwrap().to_string(), "07:00 - 07:45");
        assert_eq!(TimeSlot::parse("18:00 – 18:45").unwrap().end, t("18:45"));
        assert!(TimeSlot::parse("19:00 - 18:00").is_err());
        assert!(TimeSlot::parse("Available").is_err());
    }

    #[test]
    fn test_slot_contains_is_inclusive() {
        let slot = TimeSlot::parse("18:15 - 19:00").unwrap();
        assert!(slot.contains(t("18:15")));
        assert!(slot.contains(t("18:45")));
        assert!(slot.contains(t("19:00")));
        assert!(!slot.contains(t("19:01")));
    }

    #[test]
    fn test_slot_overlap_is_inclusive() {
        let slot = TimeSlot::parse("18:30 - 19:15").unwrap();
        assert!(slot.overlaps(&TimeRange::new(t("18:00"), t("19:30")).unwrap()));
        assert!(slot.overlaps(&TimeRange::new(t("19:00"), t("19:30")).unwrap()));

        let early = TimeSlot::parse("17:30 - 18:15").unwrap();
        assert!(!early.overlaps(&TimeRange::new(t("18:30"), t("19:30")).unwrap()));
    }

    #[test]
    fn test_clock_time_serde() {
        let json = serde_json::to_string(&t("9:30")).unwrap();
        assert_eq!(json, "\"09:30\"");
        let back: ClockTime = serde_json::from_str("\"21:15\"").unwrap();
        assert_eq!(back, t("21:15"));
    }
}
