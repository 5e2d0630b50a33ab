//! Keyword intents and court/box numbers

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref COURT_NUMBER: Regex =
        Regex::new(r"(?i)\bcourts?\s*(?:no\.?|number|#)?\s*(\d{1,2})\b").unwrap();
    static ref BOX_NUMBER: Regex =
        Regex::new(r"(?i)\bbox(?:es)?\s*(?:no\.?|number|#)?\s*(\d{1,2})\b").unwrap();
}

const WHO_IS_PLAYING: &[&str] = &[
    "who is playing",
    "who's playing",
    "who’s playing",
    "whos playing",
    "who plays",
    "who is on",
    "who is booked",
];

const WHAT_COURT_AM_I_ON: &[&str] = &[
    "what court am i on",
    "which court am i on",
    "what court am i playing",
    "which court am i playing",
    "where am i playing",
];

const TONIGHT: &[&str] = &["tonight", "this evening"];

const AVAILABLE_ONLY: &[&str] = &[
    "only available",
    "available only",
    "exclude booked",
    "available slots",
    "available courts",
    "free courts",
    "free slots",
];

const BOOKED_ONLY: &[&str] = &[
    "bookings",
    "booked only",
    "only booked",
    "booked courts",
    "booked slots",
];

/// Flags that shape an availability answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub who_is_playing: bool,
    pub what_court_am_i_on: bool,
    pub tonight: bool,
    pub available_only: bool,
    pub booked_only: bool,
}

impl Intents {
    pub fn any(&self) -> bool {
        self.who_is_playing
            || self.what_court_am_i_on
            || self.tonight
            || self.available_only
            || self.booked_only
    }
}

fn mentions(lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| lower.contains(p))
}

/// Case-insensitive phrase matching. Asking for available slots overrides
/// any booked-only wording.
pub fn detect_intents(prompt: &str) -> Intents {
    let lower = prompt.to_lowercase();
    let available_only = mentions(&lower, AVAILABLE_ONLY);
    Intents {
        who_is_playing: mentions(&lower, WHO_IS_PLAYING),
        what_court_am_i_on: mentions(&lower, WHAT_COURT_AM_I_ON),
        tonight: mentions(&lower, TONIGHT),
        available_only,
        booked_only: !available_only && mentions(&lower, BOOKED_ONLY),
    }
}

fn first_number(pattern: &Regex, prompt: &str) -> Option<u32> {
    pattern.captures(prompt)?.get(1)?.as_str().parse().ok()
}

/// `court 2`, `Court #3`, `court number 4`
pub fn extract_court_number(prompt: &str) -> Option<u32> {
    first_number(&COURT_NUMBER, prompt)
}

/// `box 3`, `Box no. 1`
pub fn extract_box_number(prompt: &str) -> Option<u32> {
    first_number(&BOX_NUMBER, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_who_is_playing_tonight() {
        let intents = detect_intents("Who is playing tonight?");
        assert!(intents.who_is_playing);
        assert!(intents.tonight);
        assert!(!intents.available_only);
        assert!(intents.any());
    }

    #[test]
    fn test_available_overrides_booked() {
        let intents = detect_intents("Show only available courts, not the bookings");
        assert!(intents.available_only);
        assert!(!intents.booked_only);

        let intents = detect_intents("I'm looking for bookings at 18:45");
        assert!(intents.booked_only);
        assert!(!intents.available_only);
    }

    #[test]
    fn test_what_court_am_i_on() {
        assert!(detect_intents("Which court am I on this evening?").what_court_am_i_on);
        assert!(!detect_intents("book court 2").any());
    }

    #[test]
    fn test_court_number() {
        assert_eq!(extract_court_number("book court 2 at 6pm"), Some(2));
        assert_eq!(extract_court_number("Court #3 please"), Some(3));
        assert_eq!(extract_court_number("court number 4"), Some(4));
        assert_eq!(extract_court_number("court 2-3"), Some(2));
        assert_eq!(extract_court_number("any court at 6pm"), None);
    }

    #[test]
    fn test_box_number() {
        assert_eq!(extract_box_number("positions in Box 3"), Some(3));
        assert_eq!(extract_box_number("box no. 1 results"), Some(1));
        assert_eq!(extract_box_number("box league standings"), None);
    }
}
