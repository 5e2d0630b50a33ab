//! Availability filters
//!
//! Every filter takes a snapshot by reference and returns a new one. Cells
//! whose time slot label does not parse are dropped by the time-based
//! filters. Only `filter_by_player` and `prune_empty_courts` remove courts.

use cs_core::{AvailabilitySnapshot, Cell, ClockTime, Court, TimeRange};
use lazy_static::lazy_static;
use tracing::debug;

lazy_static! {
    /// Start of the "tonight" window
    pub static ref EVENING_START: ClockTime = ClockTime::new(17, 0).unwrap();
}

fn retain_cells<F>(snapshot: &AvailabilitySnapshot, keep: F) -> AvailabilitySnapshot
where
    F: Fn(&Cell) -> bool,
{
    let courts = snapshot
        .courts
        .iter()
        .map(|court| Court {
            name: court.name.clone(),
            cells: court.cells.iter().filter(|c| keep(c)).cloned().collect(),
        })
        .collect();
    snapshot.with_courts(courts)
}

/// Cells whose slot contains `t` (`start <= t <= end`)
pub fn filter_by_time(snapshot: &AvailabilitySnapshot, t: ClockTime) -> AvailabilitySnapshot {
    retain_cells(snapshot, |cell| cell.slot().is_some_and(|slot| slot.contains(t)))
}

/// Cells whose slot overlaps `[from, to]`, touching edges included
pub fn filter_by_range(
    snapshot: &AvailabilitySnapshot,
    from: ClockTime,
    to: ClockTime,
) -> AvailabilitySnapshot {
    let range = TimeRange { start: from, end: to };
    retain_cells(snapshot, |cell| cell.slot().is_some_and(|slot| slot.overlaps(&range)))
}

/// Cells starting at or after `t`
pub fn filter_from(snapshot: &AvailabilitySnapshot, t: ClockTime) -> AvailabilitySnapshot {
    retain_cells(snapshot, |cell| cell.slot().is_some_and(|slot| slot.start >= t))
}

/// Cells whose player field mentions `name` (case-insensitive). Courts left
/// without cells are dropped.
pub fn filter_by_player(snapshot: &AvailabilitySnapshot, name: &str) -> AvailabilitySnapshot {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return snapshot.clone();
    }
    let filtered = retain_cells(snapshot, |cell| cell.player.to_lowercase().contains(&needle));
    prune_empty_courts(&filtered)
}

pub fn filter_booked_only(snapshot: &AvailabilitySnapshot) -> AvailabilitySnapshot {
    retain_cells(snapshot, |cell| cell.is_booked)
}

pub fn filter_available_only(snapshot: &AvailabilitySnapshot) -> AvailabilitySnapshot {
    retain_cells(snapshot, |cell| !cell.is_booked)
}

/// Only the court whose label ends in `number`
pub fn filter_by_court(snapshot: &AvailabilitySnapshot, number: u32) -> AvailabilitySnapshot {
    let courts = snapshot
        .courts
        .iter()
        .filter(|court| court.number() == Some(number))
        .cloned()
        .collect();
    snapshot.with_courts(courts)
}

pub fn prune_empty_courts(snapshot: &AvailabilitySnapshot) -> AvailabilitySnapshot {
    let courts = snapshot
        .courts
        .iter()
        .filter(|court| !court.cells.is_empty())
        .cloned()
        .collect();
    snapshot.with_courts(courts)
}

/// The filters one prompt asks for, applied in a fixed order:
/// time window, player, booking state, court, then pruning.
///
/// Only one time window applies: a range beats a specific time, which beats
/// the evening window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityFilter {
    pub at: Option<ClockTime>,
    pub range: Option<TimeRange>,
    pub from: Option<ClockTime>,
    pub player: Option<String>,
    pub booked_only: bool,
    pub available_only: bool,
    pub court: Option<u32>,
}

impl AvailabilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, t: Option<ClockTime>) -> Self {
        self.at = t;
        self
    }

    pub fn range(mut self, range: Option<TimeRange>) -> Self {
        self.range = range;
        self
    }

    /// Restrict to the evening when `tonight` is set
    pub fn evening(mut self, tonight: bool) -> Self {
        self.from = tonight.then(|| *EVENING_START);
        self
    }

    pub fn player(mut self, name: Option<String>) -> Self {
        self.player = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn booked_only(mut self, on: bool) -> Self {
        self.booked_only = on;
        self
    }

    pub fn available_only(mut self, on: bool) -> Self {
        self.available_only = on;
        self
    }

    pub fn court(mut self, number: Option<u32>) -> Self {
        self.court = number;
        self
    }

    /// True when applying would only prune empty courts
    pub fn is_empty(&self) -> bool {
        self.at.is_none()
            && self.range.is_none()
            && self.from.is_none()
            && self.player.is_none()
            && !self.booked_only
            && !self.available_only
            && self.court.is_none()
    }

    pub fn apply(&self, snapshot: &AvailabilitySnapshot) -> AvailabilitySnapshot {
        let mut shaped = if let Some(range) = self.range {
            debug!("Filtering {} to range {}", snapshot.date, range);
            filter_by_range(snapshot, range.start, range.end)
        } else if let Some(t) = self.at {
            debug!("Filtering {} to time {}", snapshot.date, t);
            filter_by_time(snapshot, t)
        } else if let Some(t) = self.from {
            debug!("Filtering {} from {}", snapshot.date, t);
            filter_from(snapshot, t)
        } else {
            snapshot.clone()
        };

        if let Some(name) = &self.player {
            debug!("Filtering to player {}", name);
            shaped = filter_by_player(&shaped, name);
        }

        if self.available_only {
            shaped = filter_available_only(&shaped);
        } else if self.booked_only {
            shaped = filter_booked_only(&shaped);
        }

        if let Some(number) = self.court {
            shaped = filter_by_court(&shaped, number);
        }

        prune_empty_courts(&shaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn snapshot() -> AvailabilitySnapshot {
        AvailabilitySnapshot::new(
            "20 Oct 26",
            vec![
                Court::new(
                    "Court 1",
                    vec![
                        Cell::booked("17:30 - 18:15", "Alice Smith vs Bob Jones"),
                        Cell::booked("18:15 - 19:00", "Carol White"),
                        Cell::available("19:00 - 19:45"),
                    ],
                ),
                Court::new(
                    "Court 2",
                    vec![
                        Cell::available("18:30 - 19:15"),
                        Cell::booked("19:15 - 20:00", "dave brown"),
                        Cell::available("not a slot"),
                    ],
                ),
            ],
        )
    }

    fn slots(s: &AvailabilitySnapshot) -> Vec<String> {
        s.courts
            .iter()
            .flat_map(|c| c.cells.iter().map(move |cell| format!("{} {}", c.name, cell.time_slot)))
            .collect()
    }

    #[test]
    fn test_filter_by_time_is_inclusive() {
        let shaped = filter_by_time(&snapshot(), t("19:00"));
        assert_eq!(
            slots(&shaped),
            vec![
                "Court 1 18:15 - 19:00",
                "Court 1 19:00 - 19:45",
                "Court 2 18:30 - 19:15"
            ]
        );
    }

    #[test]
    fn test_filter_by_range_overlap() {
        let slot = AvailabilitySnapshot::new(
            "d",
            vec![Court::new("Court 1", vec![Cell::available("18:30 - 19:15")])],
        );
        assert_eq!(filter_by_range(&slot, t("18:00"), t("19:30")).cell_count(), 1);
        assert_eq!(filter_by_range(&slot, t("19:00"), t("19:30")).cell_count(), 1);

        let early = AvailabilitySnapshot::new(
            "d",
            vec![Court::new("Court 1", vec![Cell::available("17:30 - 18:15")])],
        );
        assert_eq!(filter_by_range(&early, t("18:30"), t("19:30")).cell_count(), 0);
    }

    #[test]
    fn test_unparseable_slots_are_dropped() {
        let shaped = filter_from(&snapshot(), t("00:00"));
        assert_eq!(shaped.cell_count(), 5);
        // non-time filters keep them
        assert_eq!(filter_available_only(&snapshot()).cell_count(), 3);
    }

    #[test]
    fn test_filter_by_player_prunes_courts() {
        let shaped = filter_by_player(&snapshot(), "DAVE");
        assert_eq!(shaped.courts.len(), 1);
        assert_eq!(shaped.courts[0].name, "Court 2");

        assert!(filter_by_player(&snapshot(), "Zed").is_empty());
        assert_eq!(filter_by_player(&snapshot(), "  ").cell_count(), 6);
    }

    #[test]
    fn test_booking_state_partition() {
        let s = snapshot();
        let booked = filter_booked_only(&s).cell_count();
        let available = filter_available_only(&s).cell_count();
        assert_eq!(booked, 3);
        assert_eq!(booked + available, s.cell_count());
    }

    #[test]
    fn test_filter_by_court() {
        let shaped = filter_by_court(&snapshot(), 2);
        assert_eq!(shaped.courts.len(), 1);
        assert_eq!(shaped.courts[0].name, "Court 2");
        assert!(filter_by_court(&snapshot(), 9).is_empty());
    }

    #[test]
    fn test_composer_order_and_precedence() {
        let filter = AvailabilityFilter::new()
            .at(Some(t("18:45")))
            .evening(true)
            .booked_only(true);
        let shaped = filter.apply(&snapshot());
        assert_eq!(slots(&shaped), vec!["Court 1 18:15 - 19:00"]);

        let ranged = AvailabilityFilter::new()
            .range(Some(TimeRange::new(t("19:00"), t("20:00")).unwrap()))
            .at(Some(t("18:45")))
            .available_only(true)
            .booked_only(true)
            .apply(&snapshot());
        assert_eq!(
            slots(&ranged),
            vec!["Court 1 19:00 - 19:45", "Court 2 18:30 - 19:15"]
        );
    }

    #[test]
    fn test_evening_window() {
        let filter = AvailabilityFilter::new().evening(true);
        assert_eq!(filter.from, Some(t("17:00")));
        assert!(!filter.is_empty());
        assert!(AvailabilityFilter::new().evening(false).is_empty());
        assert_eq!(filter.apply(&snapshot()).cell_count(), 5);
    }
}
