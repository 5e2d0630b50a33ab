//! Common types used across courtside

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::time::TimeSlot;

/// One day of court bookings as returned by the booking site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub courts: Vec<Court>,
}

impl AvailabilitySnapshot {
    pub fn new(date: impl Into<String>, courts: Vec<Court>) -> Self {
        Self {
            date: date.into(),
            courts,
        }
    }

    /// Total number of cells across all courts
    pub fn cell_count(&self) -> usize {
        self.courts.iter().map(|c| c.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.courts.is_empty()
    }

    /// Build a snapshot with the same date but a different court list
    pub fn with_courts(&self, courts: Vec<Court>) -> Self {
        Self {
            date: self.date.clone(),
            courts,
        }
    }
}

/// A court and its cells for the day, in booking-site order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub name: String,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Court {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Trailing number in the court label ("Court 3" -> 3)
    pub fn number(&self) -> Option<u32> {
        self.name
            .split_whitespace()
            .last()
            .and_then(|tail| tail.trim_end_matches(':').parse().ok())
    }
}

/// One bookable time slot on one court
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub time_slot: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub is_booked: bool,
}

impl Cell {
    pub fn booked(time_slot: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            time_slot: time_slot.into(),
            status: "Booked".to_string(),
            player: player.into(),
            is_booked: true,
        }
    }

    pub fn available(time_slot: impl Into<String>) -> Self {
        Self {
            time_slot: time_slot.into(),
            status: "Available".to_string(),
            player: String::new(),
            is_booked: false,
        }
    }

    /// Parsed slot, `None` when the label is not a `HH:MM - HH:MM` pair
    pub fn slot(&self) -> Option<TimeSlot> {
        TimeSlot::parse(&self.time_slot).ok()
    }

    /// Player names when present, otherwise the status label
    pub fn label(&self) -> &str {
        let player = self.player.trim();
        if player.is_empty() {
            self.status.trim()
        } else {
            player
        }
    }

    /// Individual names of a "A vs B" player field
    pub fn players(&self) -> Vec<&str> {
        self.player
            .split(" vs ")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Record of a single tool invocation, echoed back as debug metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_name: String,
    pub parameters: BTreeMap<String, Value>,
    pub result: String,
}

impl ToolCall {
    pub fn new(
        tool_name: impl Into<String>,
        parameters: BTreeMap<String, Value>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
            result: result.into(),
        }
    }
}

/// The closed set of domain handlers a prompt can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    CourtAvailability,
    Booking,
    Cancellation,
    Stats,
    BoxPositions,
    BoxResults,
}

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        AgentKind::CourtAvailability,
        AgentKind::Booking,
        AgentKind::Cancellation,
        AgentKind::Stats,
        AgentKind::BoxPositions,
        AgentKind::BoxResults,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::CourtAvailability => "court_availability",
            AgentKind::Booking => "booking",
            AgentKind::Cancellation => "cancellation",
            AgentKind::Stats => "stats",
            AgentKind::BoxPositions => "box_positions",
            AgentKind::BoxResults => "box_results",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .to_lowercase()
            .replace([' ', '-'], "_");
        match cleaned.as_str() {
            "court_availability" | "availability" => Ok(AgentKind::CourtAvailability),
            "booking" => Ok(AgentKind::Booking),
            "cancellation" => Ok(AgentKind::Cancellation),
            "stats" => Ok(AgentKind::Stats),
            "box_positions" => Ok(AgentKind::BoxPositions),
            "box_results" => Ok(AgentKind::BoxResults),
            other => Err(format!("Unknown agent kind: {}", other)),
        }
    }
}

/// Request to book or cancel one slot on the booking site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRequest {
    /// Date in `dd MMM yy` form
    pub date: String,
    /// Start time, `HH:MM`
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

/// One player's line in a box league table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub points: u32,
}

/// A box (mini-league) and its players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxTable {
    pub name: String,
    #[serde(default)]
    pub players: Vec<PlayerStanding>,
}

/// A completed box match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxResult {
    #[serde(rename = "box")]
    pub box_name: String,
    pub winner: String,
    pub loser: String,
    pub score: String,
}
