//! Player-name extraction
//!
//! Names are recognised by shape only: two capitalised words (`Alice Smith`)
//! or an initial and a surname (`J Smith`, `J. Smith`). Nothing is checked
//! against a member roster, so capitalised phrases can still slip through;
//! the stop-word list rejects the common ones.

/// Words that never start a name
const STOP_WORDS: &[&str] = &[
    "a", "am", "an", "and", "any", "are", "at", "between", "book", "booked", "booking",
    "bookings", "box", "boxes", "can", "cancel", "could", "court", "courts", "did", "do",
    "does", "find", "for", "free", "from", "get", "give", "hello", "hi", "how", "i", "i'm",
    "is", "league", "list", "me", "my", "next", "on", "please", "pm", "reserve", "results",
    "show", "slot", "slots", "squash", "standings", "tell", "thanks", "the", "this",
    "today", "tomorrow", "tonight", "was", "week", "were", "what", "when", "where",
    "which", "who", "whos", "who's", "will", "with", "would", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday", "january", "february",
    "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];

fn is_stop_word(word: &str) -> bool {
    let lower = word.trim_end_matches('.').to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Strip surrounding punctuation and a possessive `'s`, keeping the dot of
/// an initial such as `J.`
fn clean(raw: &str) -> &str {
    let word = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '\'' && c != '’');
    let word = word
        .strip_suffix("'s")
        .or_else(|| word.strip_suffix("’s"))
        .unwrap_or(word);
    let word = word.trim_matches(|c: char| c == '\'' || c == '’');
    if is_initial(word) {
        word
    } else {
        word.trim_end_matches('.')
    }
}

fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None) => c.is_ascii_uppercase(),
        (Some(c), Some('.'), None) => c.is_ascii_uppercase(),
        _ => false,
    }
}

fn is_capitalised(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest: Vec<char> = chars.collect();
    first.is_uppercase()
        && !rest.is_empty()
        && rest.iter().any(|c| c.is_lowercase())
        && rest
            .iter()
            .all(|c| c.is_alphabetic() || *c == '\'' || *c == '’' || *c == '-')
}

fn name_at(words: &[&str], i: usize) -> Option<String> {
    let first = *words.get(i)?;
    let second = *words.get(i + 1)?;
    if is_stop_word(first) {
        return None;
    }
    if (is_capitalised(first) || is_initial(first)) && is_capitalised(second) {
        Some(format!("{} {}", first, second))
    } else {
        None
    }
}

/// A two-token player name, preferring one that follows the word "for"
pub fn extract_player_name(prompt: &str) -> Option<String> {
    let words: Vec<&str> = prompt
        .split_whitespace()
        .map(clean)
        .filter(|w| !w.is_empty())
        .collect();

    let after_for = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.eq_ignore_ascii_case("for"))
        .find_map(|(i, _)| name_at(&words, i + 1));

    after_for.or_else(|| (0..words.len()).find_map(|i| name_at(&words, i)))
}
