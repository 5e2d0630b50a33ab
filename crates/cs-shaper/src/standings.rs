//! Box league standings decoration
//!
//! Works on plain text so it can post-process either tool output or model
//! replies. A player line is any line carrying both a played and a points
//! count (`Played: 5`, `P 5`, `Points: 9`, `Pts 9`). All player lines
//! between two `Box ...` headers form one table; blank lines and notes in
//! between stay where they are.
//!
//! Each table is re-ranked and re-numbered with medals for the top three and
//! a wooden spoon for last place in tables larger than three. Existing
//! decoration is stripped first, so running the pass over its own output
//! gives the same text.

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use tracing::debug;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
const SPOON: &str = "🥄";

lazy_static! {
    static ref DECORATION: Regex = Regex::new(r"^\s*(?:(?:[-*•]\s+)|(?:\d+\.\s*)|(?:🥇|🥈|🥉|🥄)\s*)+").unwrap();
    static ref BOX_HEADER: Regex = Regex::new(r"(?i)^\s*(?:#+\s*)?(?:\*\*)?\s*box\b").unwrap();
    static ref PLAYED: Regex = Regex::new(r"(?i)\b(?:played|p)\s*[:=]?\s*(\d+)").unwrap();
    static ref WON: Regex = Regex::new(r"(?i)\b(?:won|wins|win|w)\s*[:=]?\s*(\d+)").unwrap();
    static ref POINTS: Regex = Regex::new(r"(?i)\b(?:points|pts|pt)\s*[:=]?\s*(\d+)").unwrap();
}

#[derive(Debug, Clone)]
struct Standing {
    name: String,
    played: u32,
    won: u32,
    points: u32,
    body: String,
}

fn capture_number(pattern: &Regex, text: &str) -> Option<(usize, u32)> {
    let caps = pattern.captures(text)?;
    let whole = caps.get(0)?;
    let value = caps.get(1)?.as_str().parse().ok()?;
    Some((whole.start(), value))
}

impl Standing {
    fn parse(line: &str) -> Option<Self> {
        if is_box_header(line) {
            return None;
        }
        let unbolded = line.replace("**", "");
        let body = DECORATION.replace(&unbolded, "").trim().to_string();

        let (played_at, played) = capture_number(&PLAYED, &body)?;
        let (points_at, points) = capture_number(&POINTS, &body)?;
        let won = capture_number(&WON, &body).map(|(_, w)| w).unwrap_or(0);

        let stats_start = played_at.min(points_at);
        let name = body[..stats_start]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | ',' | '|' | '('))
            .to_string();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            played,
            won,
            points,
            body,
        })
    }

    fn rank_order(a: &Self, b: &Self) -> Ordering {
        b.points
            .cmp(&a.points)
            .then(b.won.cmp(&a.won))
            .then(b.played.cmp(&a.played))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    }
}

fn is_box_header(line: &str) -> bool {
    BOX_HEADER.is_match(line)
}

/// One box section: output lines with player rows left as empty slots
#[derive(Default)]
struct Section {
    lines: Vec<Option<String>>,
    table: Vec<Standing>,
}

impl Section {
    fn push_line(&mut self, line: &str) {
        self.lines.push(Some(line.to_string()));
    }

    fn push_standing(&mut self, standing: Standing) {
        self.lines.push(None);
        self.table.push(standing);
    }

    fn flush(&mut self, out: &mut Vec<String>) {
        let mut ranked = rank(std::mem::take(&mut self.table)).into_iter();
        for slot in self.lines.drain(..) {
            match slot {
                Some(line) => out.push(line),
                None => out.extend(ranked.next()),
            }
        }
    }
}

fn rank(mut table: Vec<Standing>) -> Vec<String> {
    table.sort_by(Standing::rank_order);
    let size = table.len();
    if size > 0 {
        debug!("Ranking table of {} players", size);
    }

    table
        .into_iter()
        .enumerate()
        .map(|(i, standing)| {
            let marker = if i < MEDALS.len() {
                Some(MEDALS[i])
            } else if size > MEDALS.len() && i + 1 == size {
                Some(SPOON)
            } else {
                None
            };
            match marker {
                Some(m) => format!("{}. {} {}", i + 1, m, standing.body),
                None => format!("{}. {}", i + 1, standing.body),
            }
        })
        .collect()
}

fn keep_trailing_newline(source: &str, mut rendered: String) -> String {
    if source.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Re-rank and decorate every standings table in `text`
pub fn decorate_standings(text: &str) -> String {
    let mut out = Vec::new();
    let mut section = Section::default();

    for line in text.lines() {
        if is_box_header(line) {
            section.flush(&mut out);
            section.push_line(line);
            continue;
        }
        match Standing::parse(line) {
            Some(standing) => section.push_standing(standing),
            None => section.push_line(line),
        }
    }
    section.flush(&mut out);

    keep_trailing_newline(text, out.join("\n"))
}

/// Bold the first mention of `name` on each line, box headers excluded
pub fn highlight_player(text: &str, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return text.to_string();
    }
    let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(name))) else {
        return text.to_string();
    };

    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            if is_box_header(line) {
                return line.to_string();
            }
            match pattern.find(line) {
                Some(m) if !is_bold_at(line, m.start(), m.end()) => format!(
                    "{}**{}**{}",
                    &line[..m.start()],
                    m.as_str(),
                    &line[m.end()..]
                ),
                _ => line.to_string(),
            }
        })
        .collect();

    keep_trailing_newline(text, lines.join("\n"))
}

fn is_bold_at(line: &str, start: usize, end: usize) -> bool {
    line[..start].ends_with("**") && line[end..].starts_with("**")
}

/// Ranking followed by highlighting of the requesting member
pub fn decorate(text: &str, player: Option<&str>) -> String {
    let ranked = decorate_standings(text);
    match player {
        Some(name) => highlight_player(&ranked, name),
        None => ranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, played: u32, won: u32, points: u32) -> String {
        format!(
            "{} - Played: {}, Won: {}, Lost: {}, Points: {}",
            name,
            played,
            won,
            played - won,
            points
        )
    }

    fn two_boxes() -> String {
        let box1 = [
            line("Frank Hill", 5, 1, 3),
            line("Alice Smith", 5, 4, 9),
            line("Bob Jones", 5, 3, 8),
            line("Carol White", 4, 3, 8),
            line("Dan Brown", 5, 2, 6),
            line("Eve Black", 5, 0, 1),
        ];
        let box2 = [
            line("Gus Grey", 3, 1, 4),
            line("Hana Park", 3, 3, 7),
            line("ian moss", 3, 2, 5),
            line("Ivy Green", 3, 2, 5),
            line("Jon Dee", 2, 0, 0),
            line("Kim Lee", 3, 1, 4),
        ];
        format!("Box 1\n{}\n\nBox 2\n{}", box1.join("\n"), box2.join("\n"))
    }

    fn names(text: &str) -> Vec<String> {
        text.lines().filter_map(Standing::parse).map(|s| s.name).collect()
    }

    #[test]
    fn test_each_box_ranked_independently() {
        let decorated = decorate_standings(&two_boxes());
        let lines: Vec<&str> = decorated.lines().collect();

        assert_eq!(lines[0], "Box 1");
        assert!(lines[1].starts_with("1. 🥇 Alice Smith"));
        // ties on points and wins fall back to games played
        assert!(lines[2].starts_with("2. 🥈 Bob Jones"));
        assert!(lines[3].starts_with("3. 🥉 Carol White"));
        assert!(lines[4].starts_with("4. Dan Brown"));
        assert!(lines[6].starts_with("6. 🥄 Eve Black"));
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "Box 2");
        assert!(lines[9].starts_with("1. 🥇 Hana Park"));
        // full tie broken by name, case-insensitively
        assert!(lines[10].starts_with("2. 🥈 ian moss"));
        assert!(lines[11].starts_with("3. 🥉 Ivy Green"));
        assert!(lines[12].starts_with("4. Gus Grey"));
        assert!(lines[14].starts_with("6. 🥄 Jon Dee"));

        assert_eq!(names(&decorated).len(), 12);
    }

    #[test]
    fn test_decoration_is_idempotent() {
        let once = decorate(&two_boxes(), Some("Bob Jones"));
        let twice = decorate(&once, Some("Bob Jones"));
        assert_eq!(once, twice);
        assert_eq!(once.matches("**Bob Jones**").count(), 1);
    }

    #[test]
    fn test_strips_foreign_decoration() {
        let messy = "**Box 3**\n- 🥄 2. **Ann Lo** - P 4, W 1, Pts 3\n1. 🥇 Bea Yu - Played: 4, Wins: 3, Points: 8";
        let decorated = decorate_standings(messy);
        assert_eq!(
            decorated,
            "**Box 3**\n1. 🥇 Bea Yu - Played: 4, Wins: 3, Points: 8\n2. 🥈 Ann Lo - P 4, W 1, Pts 3"
        );
    }

    #[test]
    fn test_small_box_has_no_spoon() {
        let text = format!("Box 4\n{}\n{}\n{}", line("A One", 2, 2, 6), line("B Two", 2, 1, 4), line("C Three", 2, 0, 1));
        let decorated = decorate_standings(&text);
        assert!(decorated.contains("3. 🥉 C Three"));
        assert!(!decorated.contains(SPOON));
    }

    #[test]
    fn test_highlight_first_match_only() {
        let text = "Box 1\nAlice Smith beat alice smith jr 3-0";
        let highlighted = highlight_player(text, "Alice Smith");
        assert_eq!(highlighted, "Box 1\n**Alice Smith** beat alice smith jr 3-0");
        assert_eq!(highlight_player(&highlighted, "Alice Smith"), highlighted);
        assert_eq!(highlight_player(text, " "), text);
    }

    #[test]
    fn test_blank_line_does_not_split_box() {
        let text = format!(
            "Box 1\n{}\n{}\n\n{}\n{}",
            line("Ann Lo", 3, 3, 9),
            line("Bea Yu", 3, 2, 6),
            line("Cy Ng", 3, 3, 12),
            line("Di Ho", 3, 0, 1)
        );
        let decorated = decorate_standings(&text);
        let lines: Vec<&str> = decorated.lines().collect();

        assert_eq!(decorated.matches("🥇").count(), 1);
        assert!(lines[1].starts_with("1. 🥇 Cy Ng"));
        assert!(lines[2].starts_with("2. 🥈 Ann Lo"));
        assert_eq!(lines[3], "");
        assert!(lines[4].starts_with("3. 🥉 Bea Yu"));
        assert!(lines[5].starts_with("4. 🥄 Di Ho"));
        assert_eq!(decorate_standings(&decorated), decorated);
    }

    #[test]
    fn test_non_table_text_untouched() {
        let text = "No box league tables found.\n";
        assert_eq!(decorate_standings(text), text);
    }
}
