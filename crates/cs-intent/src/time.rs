//! Clock-time and time-range extraction
//!
//! Accepted token forms: `18:00`, `6:30`, `6pm`, `6 pm`, `6:30pm`. Bare hours
//! (`6`) only count when two of them are joined by a range connector such as
//! `6 to 7`, `6-7` or `between 6 and 7`.

use cs_core::{ClockTime, TimeRange};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

/// One time-like token, before 24-hour resolution
const TIME: &str = r"\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?";

/// Words that make a following number a label rather than a time
const LABEL_WORDS: &[&str] = &["court", "courts", "box", "boxes", "no", "number"];

lazy_static! {
    static ref SPECIFIC_TIME: Regex =
        Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?:\s*(am|pm)\b|\b)").unwrap();
    static ref TIME_TOKEN: Regex =
        Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?(?:\s*(am|pm)\b|\b)").unwrap();
    static ref BETWEEN: Regex =
        Regex::new(&format!(r"(?i)\bbetween\s+({t})\s+and\s+({t})\b", t = TIME)).unwrap();
    static ref CONNECTED: Regex =
        Regex::new(&format!(r"(?i)\b({t})\s*(?:-|–|to|until|till)\s*({t})\b", t = TIME)).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy)]
struct RawTime {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
    has_colon: bool,
}

impl RawTime {
    /// Groups: 1 = hour, 2 = minutes (optional), 3 = am/pm (optional)
    fn from_captures(caps: &Captures) -> Option<Self> {
        let hour = caps.get(1)?.as_str().parse().ok()?;
        let minute = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let meridiem = caps.get(3).map(|m| {
            if m.as_str().eq_ignore_ascii_case("am") {
                Meridiem::Am
            } else {
                Meridiem::Pm
            }
        });
        Some(Self {
            hour,
            minute,
            meridiem,
            has_colon: caps.get(2).is_some(),
        })
    }

    fn parse(token: &str) -> Option<Self> {
        TIME_TOKEN
            .captures(token)
            .and_then(|caps| Self::from_captures(&caps))
    }

    /// Written with minutes or am/pm, so not just any number
    fn is_explicit(&self) -> bool {
        self.has_colon || self.meridiem.is_some()
    }

    fn resolve(&self) -> Option<ClockTime> {
        self.resolve_with(self.meridiem)
    }

    /// Bare 1-11 read as pm when the prompt is about the evening
    fn meridiem_hint(&self, evening: bool) -> Option<Meridiem> {
        match self.meridiem {
            Some(m) => Some(m),
            None if evening && !self.has_colon && (1..12).contains(&self.hour) => {
                Some(Meridiem::Pm)
            }
            None => None,
        }
    }

    fn resolve_with(&self, meridiem: Option<Meridiem>) -> Option<ClockTime> {
        let hour = match meridiem {
            None => self.hour,
            Some(_) if self.hour == 0 || self.hour > 12 => return None,
            Some(Meridiem::Am) => self.hour % 12,
            Some(Meridiem::Pm) => self.hour % 12 + 12,
        };
        ClockTime::new(hour, self.minute)
    }
}

fn follows_label(prompt: &str, pos: usize) -> bool {
    let before = prompt[..pos].trim_end();
    let last_word = before
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_lowercase();
    LABEL_WORDS.contains(&last_word.as_str())
}

/// First `H:MM`/`HH:MM` token. An out-of-range first token yields `None`.
pub fn extract_specific_time(prompt: &str) -> Option<ClockTime> {
    let caps = SPECIFIC_TIME.captures(prompt)?;
    RawTime::from_captures(&caps)?.resolve()
}

/// First token written with minutes or am/pm (`18:00`, `6pm`, `6:30 pm`)
pub fn extract_any_time(prompt: &str) -> Option<ClockTime> {
    TIME_TOKEN
        .captures_iter(prompt)
        .filter_map(|caps| RawTime::from_captures(&caps))
        .find(RawTime::is_explicit)?
        .resolve()
}

fn find_pair(prompt: &str) -> Option<(RawTime, RawTime)> {
    for pattern in [&*BETWEEN, &*CONNECTED] {
        for caps in pattern.captures_iter(prompt) {
            let Some(first) = caps.get(1) else { continue };
            if follows_label(prompt, first.start()) {
                continue;
            }
            if let (Some(a), Some(b)) = (RawTime::parse(first.as_str()), RawTime::parse(&caps[2])) {
                return Some((a, b));
            }
        }
    }

    let explicit: Vec<RawTime> = TIME_TOKEN
        .captures_iter(prompt)
        .filter_map(|caps| RawTime::from_captures(&caps))
        .filter(RawTime::is_explicit)
        .take(2)
        .collect();
    match explicit.as_slice() {
        [a, b] => Some((*a, *b)),
        _ => None,
    }
}

/// Two time-like tokens as a normalized window.
///
/// When the start has no am/pm but the end does, the end's marker is carried
/// back if that keeps the order (`6 to 7pm` is 18:00-19:00). If the end is
/// still earlier than the start it is assumed to be twelve hours later
/// (`between 7 and 9:30` stays morning, `between 7 and 1` becomes 07:00-13:00).
/// This also fires on spans that really cross midnight or noon in the
/// morning; callers get `None` only when the shifted end is still not later.
pub fn extract_time_range(prompt: &str) -> Option<TimeRange> {
    resolve_range(prompt, false)
}

/// Like [`extract_time_range`], but bare hours from 1 to 11 are read as pm
/// (`tonight between 6 and 7` is 18:00-19:00). Explicit am/pm and `H:MM`
/// tokens keep their meaning.
pub fn extract_evening_time_range(prompt: &str) -> Option<TimeRange> {
    resolve_range(prompt, true)
}

fn resolve_range(prompt: &str, evening: bool) -> Option<TimeRange> {
    let (a, b) = find_pair(prompt)?;
    let end_meridiem = b.meridiem_hint(evening);

    let mut start_meridiem = a.meridiem_hint(evening);
    if start_meridiem.is_none() && end_meridiem.is_some() {
        if let (Some(s), Some(e)) = (a.resolve_with(end_meridiem), b.resolve_with(end_meridiem)) {
            if s < e {
                start_meridiem = end_meridiem;
            }
        }
    }

    let start = a.resolve_with(start_meridiem)?;
    let mut end = b.resolve_with(end_meridiem)?;
    if end < start {
        end = end.add_hours(12)?;
        debug!("Range end shifted by 12h to {}", end);
    }
    if end <= start {
        return None;
    }
    TimeRange::new(start, end).ok()
}
