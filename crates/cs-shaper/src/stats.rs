//! Court utilisation summary

use cs_core::{AvailabilitySnapshot, ClockTime};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourtUsage {
    pub name: String,
    pub booked: usize,
    pub total: usize,
}

impl CourtUsage {
    /// Booked share rounded to the nearest whole percent
    pub fn percent(&self) -> usize {
        percent(self.booked, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityStats {
    pub date: String,
    pub courts: Vec<CourtUsage>,
    pub booked: usize,
    pub total: usize,
    /// Start time with the most bookings, earliest on ties
    pub busiest_start: Option<ClockTime>,
    pub busiest_bookings: usize,
}

impl AvailabilityStats {
    pub fn percent(&self) -> usize {
        percent(self.booked, self.total)
    }
}

fn percent(part: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        (part * 100 + total / 2) / total
    }
}

pub fn summarize(snapshot: &AvailabilitySnapshot) -> AvailabilityStats {
    let mut starts: BTreeMap<ClockTime, usize> = BTreeMap::new();
    let courts: Vec<CourtUsage> = snapshot
        .courts
        .iter()
        .map(|court| {
            let booked = court.cells.iter().filter(|c| c.is_booked).count();
            for slot in court.cells.iter().filter(|c| c.is_booked).filter_map(|c| c.slot()) {
                *starts.entry(slot.start).or_default() += 1;
            }
            CourtUsage {
                name: court.name.clone(),
                booked,
                total: court.cells.len(),
            }
        })
        .collect();

    let mut busiest: Option<(ClockTime, usize)> = None;
    for (start, count) in starts {
        if busiest.map_or(true, |(_, best)| count > best) {
            busiest = Some((start, count));
        }
    }

    AvailabilityStats {
        date: snapshot.date.clone(),
        booked: courts.iter().map(|c| c.booked).sum(),
        total: courts.iter().map(|c| c.total).sum(),
        courts,
        busiest_start: busiest.map(|(t, _)| t),
        busiest_bookings: busiest.map(|(_, n)| n).unwrap_or(0),
    }
}

pub fn render_stats(stats: &AvailabilityStats) -> String {
    let day = if stats.date.is_empty() {
        "today".to_string()
    } else {
        stats.date.clone()
    };
    if stats.total == 0 {
        return format!("No court data available for {}.", day);
    }

    let mut lines = vec![format!("Court utilisation for {}", day)];
    for court in &stats.courts {
        lines.push(format!(
            "- {}: {}/{} booked ({}%)",
            court.name,
            court.booked,
            court.total,
            court.percent()
        ));
    }
    lines.push(format!(
        "Overall: {}/{} booked ({}%)",
        stats.booked,
        stats.total,
        stats.percent()
    ));
    match stats.busiest_start {
        Some(start) => lines.push(format!(
            "Busiest start time: {} ({} {})",
            start,
            stats.busiest_bookings,
            if stats.busiest_bookings == 1 { "booking" } else { "bookings" }
        )),
        None => lines.push("No bookings yet.".to_string()),
    }
    lines.join("\n")
}
