//! Agent implementations
//!
//! - availability: court availability and "who is playing"
//! - booking: booking and cancellation
//! - boxes: box league positions and results
//! - stats: court utilisation report

pub mod availability;
pub mod base;
pub mod booking;
pub mod boxes;
pub mod stats;

pub use availability::CourtAvailabilityAgent;
pub use base::{apology, Agent, BoxedAgent};
pub use booking::{BookingAgent, CancellationAgent};
pub use boxes::{BoxPositionsAgent, BoxResultsAgent};
pub use stats::StatsAgent;
