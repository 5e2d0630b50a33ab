use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::schema::{ParamKind, ParameterSchema, Parameters};
use crate::sources::AvailabilitySource;
use crate::tool::Tool;

/// Fetches one day's availability snapshot as JSON
pub struct GetCourtAvailabilityTool {
    source: Arc<dyn AvailabilitySource>,
}

impl GetCourtAvailabilityTool {
    pub fn new(source: Arc<dyn AvailabilitySource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetCourtAvailabilityTool {
    fn name(&self) -> &str {
        super::GET_COURT_AVAILABILITY
    }

    fn description(&self) -> &str {
        "Get every court's time slots for one day, including who is booked on each slot. \
         Returns JSON with courts, each holding cells of timeSlot, status, player and isBooked."
    }

    fn schema(&self) -> ParameterSchema {
        ParameterSchema::new().optional(
            "date",
            ParamKind::String,
            "Day to fetch in 'dd MMM yy' form, e.g. '20 Oct 26'. Omit for today.",
        )
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        let date = params.get_str("date");
        let snapshot = self.source.fetch(date).await?;
        debug!(
            "Fetched availability for {:?}: {} courts, {} cells",
            date,
            snapshot.courts.len(),
            snapshot.cell_count()
        );
        Ok(serde_json::to_string(&snapshot)?)
    }
}
