//! Structured text blocks
//!
//! The structured block is the canonical answer format. It is returned as is
//! in deterministic mode and handed to the model as the only data it may
//! rephrase otherwise.

use cs_core::{AvailabilitySnapshot, Cell, Court};

pub const NO_MATCH_MESSAGE: &str = "No matching courts or time slots found.";

fn render_cell(cell: &Cell) -> String {
    let slot = cell
        .slot()
        .map(|s| s.to_string())
        .unwrap_or_else(|| cell.time_slot.trim().to_string());
    format!("  - **{}**: {}", slot, cell.label())
}

fn render_court(court: &Court) -> String {
    let mut lines = Vec::with_capacity(court.cells.len() + 1);
    lines.push(format!("- **{}:**", court.name.trim()));
    lines.extend(court.cells.iter().map(render_cell));
    lines.join("\n")
}

/// One section per court, separated by blank lines; empty when there are no
/// courts.
pub fn build_structured_block(snapshot: &AvailabilitySnapshot) -> String {
    snapshot
        .courts
        .iter()
        .map(render_court)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `Day <n> — <label>` headed sections, one per requested day
pub fn build_multi_day_block(sections: &[(String, AvailabilitySnapshot)]) -> String {
    sections
        .iter()
        .enumerate()
        .map(|(i, (label, snapshot))| {
            let block = build_structured_block(snapshot);
            let body = if block.is_empty() {
                NO_MATCH_MESSAGE.to_string()
            } else {
                block
            };
            format!("Day {} — {}\n{}", i + 1, label, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AvailabilitySnapshot {
        AvailabilitySnapshot::new(
            "20 Oct 26",
            vec![
                Court::new(
                    "Court 1",
                    vec![
                        Cell::booked("17:45-18:30", "Alice vs Bob"),
                        Cell::available("18:30 - 19:15"),
                    ],
                ),
                Court::new("Court 2", vec![Cell::available("18:00 - 18:45")]),
            ],
        )
    }

    #[test]
    fn test_structured_block() {
        let block = build_structured_block(&snapshot());
        assert_eq!(
            block,
            "- **Court 1:**\n  - **17:45 - 18:30**: Alice vs Bob\n  - **18:30 - 19:15**: Available\n\n\
             - **Court 2:**\n  - **18:00 - 18:45**: Available"
        );
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(build_structured_block(&AvailabilitySnapshot::default()), "");
    }

    #[test]
    fn test_multi_day_block() {
        let sections = vec![
            ("Tuesday 20 Oct".to_string(), snapshot()),
            ("Monday 26 Oct".to_string(), AvailabilitySnapshot::default()),
        ];
        let block = build_multi_day_block(&sections);
        assert!(block.starts_with("Day 1 — Tuesday 20 Oct\n- **Court 1:**"));
        assert!(block.ends_with(&format!("\n\nDay 2 — Monday 26 Oct\n{}", NO_MATCH_MESSAGE)));
    }

    #[test]
    fn test_multi_day_all_empty() {
        let sections = vec![
            ("A".to_string(), AvailabilitySnapshot::default()),
            ("B".to_string(), AvailabilitySnapshot::default()),
        ];
        assert_eq!(
            build_multi_day_block(&sections),
            format!("Day 1 — A\n{0}\n\nDay 2 — B\n{0}", NO_MATCH_MESSAGE)
        );
    }
}
