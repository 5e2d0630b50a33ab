//! System prompts, date-stamped per request

use cs_core::RequestContext;

const CLUB_CONTEXT: &str = "You are the assistant of a squash club. Members ask about \
court bookings and the box league. Dates are written 'dd MMM yy' (e.g. '20 Oct 26') \
and times 'HH:MM' on a 24-hour clock.";

const PHRASING_RULES: &str = "Answer only from tool results or the data you are given. \
Never invent courts, times or names. Always name courts as they appear (e.g. 'Court 1') \
and keep every time slot exactly as written.";

pub const COURT_AVAILABILITY: &str = "You answer questions about which squash courts are \
free or booked and who is playing. Use get_court_availability to fetch a day's courts.";

pub const BOOKING: &str = "You book squash courts for members. Use book_court with the \
date and start time the member asked for. If they did not give a time, ask for one.";

pub const CANCELLATION: &str = "You cancel squash court bookings for members. Use \
cancel_booking with the date and start time of the booking.";

pub const BOX_POSITIONS: &str = "You report box league standings. Use get_box_positions \
and keep each player's played, won, lost and points figures.";

pub const BOX_RESULTS: &str = "You report box league match results. Use get_box_results \
and keep every score as written.";

pub const ROUTER: &str = "Classify the member's message for a squash club assistant.";

/// Role description plus the shared club rules and today's date
pub fn system_prompt(role: &str, ctx: &RequestContext) -> String {
    let mut prompt = format!(
        "{}\n\n{}\n\n{}\n\nToday is {}.",
        CLUB_CONTEXT,
        role,
        PHRASING_RULES,
        ctx.today.format("%A %d %b %Y")
    );
    if let Some(user) = &ctx.user_id {
        prompt.push_str(&format!(" The member asking is {}.", user));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prompt_is_date_stamped() {
        let ctx = RequestContext::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
            .with_user("Alice Smith");
        let prompt = system_prompt(BOOKING, &ctx);
        assert!(prompt.contains("Today is Tuesday 20 Oct 2026."));
        assert!(prompt.contains("The member asking is Alice Smith."));
        assert!(prompt.contains("book_court"));
    }
}
