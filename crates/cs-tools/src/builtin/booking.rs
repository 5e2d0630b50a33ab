use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cs_core::{ClockTime, SlotRequest};
use std::sync::Arc;

use crate::schema::{ParamKind, ParameterSchema, Parameters};
use crate::sources::BookingGateway;
use crate::tool::Tool;

fn slot_request(params: &Parameters) -> Result<SlotRequest> {
    let date = params
        .get_str("date")
        .ok_or_else(|| anyhow!("a date is required"))?;
    let time = params
        .get_str("time")
        .ok_or_else(|| anyhow!("a start time is required"))?;
    let time = ClockTime::parse(time)
        .map_err(|_| anyhow!("start time must look like HH:MM, got '{}'", time))?;

    Ok(SlotRequest {
        date: date.to_string(),
        time: time.to_string(),
        court: params.get_u32("court"),
        player: params.get_str("player").map(str::to_string),
    })
}

/// Books a court slot
pub struct BookCourtTool {
    gateway: Arc<dyn BookingGateway>,
}

impl BookCourtTool {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for BookCourtTool {
    fn name(&self) -> &str {
        super::BOOK_COURT
    }

    fn description(&self) -> &str {
        "Book a squash court. Requires the date and the start time of the slot; \
         court number and player name are optional."
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .required("date", ParamKind::String, "Date in 'dd MMM yy' form, e.g. '20 Oct 26'")
            .required("time", ParamKind::String, "Slot start time, HH:MM 24-hour")
            .optional("court", ParamKind::Integer, "Court number")
            .optional("player", ParamKind::String, "Name to book under")
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        let request = slot_request(&params)?;
        self.gateway.book(&request).await
    }
}

/// Cancels an existing booking
pub struct CancelBookingTool {
    gateway: Arc<dyn BookingGateway>,
}

impl CancelBookingTool {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CancelBookingTool {
    fn name(&self) -> &str {
        super::CANCEL_BOOKING
    }

    fn description(&self) -> &str {
        "Cancel a squash court booking identified by its date and start time, \
         optionally narrowed to one court."
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .required("date", ParamKind::String, "Date in 'dd MMM yy' form, e.g. '20 Oct 26'")
            .required("time", ParamKind::String, "Slot start time, HH:MM 24-hour")
            .optional("court", ParamKind::Integer, "Court number")
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        let request = slot_request(&params)?;
        self.gateway.cancel(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::DryRunBookingGateway;
    use serde_json::json;

    #[tokio::test]
    async fn test_book_normalizes_time() {
        let tool = BookCourtTool::new(Arc::new(DryRunBookingGateway));
        let params = tool
            .schema()
            .validate(&json!({"date": "20 Oct 26", "time": "6:15", "court": 2, "player": "Alice Smith"}))
            .unwrap();

        let text = tool.execute(params).await.unwrap();
        assert_eq!(
            text,
            "Dry run: would book 20 Oct 26 at 06:15 on Court 2 for Alice Smith"
        );
    }

    #[tokio::test]
    async fn test_cancel_rejects_bad_time() {
        let tool = CancelBookingTool::new(Arc::new(DryRunBookingGateway));
        let params = tool
            .schema()
            .validate(&json!({"date": "20 Oct 26", "time": "6pm"}))
            .unwrap();

        let err = tool.execute(params).await.unwrap_err();
        assert!(err.to_string().contains("HH:MM"));
    }
}
