//! Built-in tools over the booking-site collaborators

mod availability;
mod booking;
mod boxes;

pub use availability::GetCourtAvailabilityTool;
pub use booking::{BookCourtTool, CancelBookingTool};
pub use boxes::{render_box_results, render_box_tables, GetBoxPositionsTool, GetBoxResultsTool};

pub const GET_COURT_AVAILABILITY: &str = "get_court_availability";
pub const BOOK_COURT: &str = "book_court";
pub const CANCEL_BOOKING: &str = "cancel_booking";
pub const GET_BOX_POSITIONS: &str = "get_box_positions";
pub const GET_BOX_RESULTS: &str = "get_box_results";
