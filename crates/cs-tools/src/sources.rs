//! External collaborators behind the built-in tools
//!
//! The booking site itself (login, scraping, posting forms) lives behind a
//! small proxy service. These traits describe what the tools need from it;
//! [`HttpBookingSite`] talks to the proxy, the static implementations serve
//! fixtures and tests.
//!
//! ## Proxy endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/availability?date=dd MMM yy` | One day's snapshot |
//! | POST | `/bookings` | Book a slot |
//! | POST | `/cancellations` | Cancel a booking |
//! | GET | `/boxes/positions?box=n` | Box league tables |
//! | GET | `/boxes/results?box=n` | Box league results |

use anyhow::{Context, Result};
use async_trait::async_trait;
use cs_core::{AvailabilitySnapshot, BoxResult, BoxTable, SlotRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

// =============================================================================
// COLLABORATOR TRAITS
// =============================================================================

/// Source of court availability snapshots
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Fetch one day; `None` means the booking site's default day (today)
    async fn fetch(&self, date: Option<&str>) -> Result<AvailabilitySnapshot>;
}

/// Books and cancels slots on the booking site
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Returns the site's confirmation text
    async fn book(&self, request: &SlotRequest) -> Result<String>;

    /// Returns the site's confirmation text
    async fn cancel(&self, request: &SlotRequest) -> Result<String>;
}

/// Box league tables and results
#[async_trait]
pub trait BoxLeagueSource: Send + Sync {
    async fn positions(&self, box_number: Option<u32>) -> Result<Vec<BoxTable>>;

    async fn results(&self, box_number: Option<u32>) -> Result<Vec<BoxResult>>;
}

// =============================================================================
// HTTP PROXY CLIENT
// =============================================================================

#[derive(Debug, Deserialize)]
struct Confirmation {
    #[serde(default)]
    message: String,
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Client for the booking-site proxy
pub struct HttpBookingSite {
    client: Client,
    base_url: String,
}

impl HttpBookingSite {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("COURTSIDE_BOOKING_URL")
            .context("COURTSIDE_BOOKING_URL environment variable not set")?;
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Booking proxy GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to reach booking proxy at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Booking proxy error {}: {}", status, body));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse booking proxy response from {}", path))
    }

    async fn post_slot(&self, path: &str, request: &SlotRequest) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        info!("Booking proxy POST {} {} {}", url, request.date, request.time);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach booking proxy at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Booking proxy error {}: {}", status, body));
        }

        let confirmation: Confirmation = response
            .json()
            .await
            .context("Failed to parse booking proxy confirmation")?;

        if !confirmation.success {
            return Err(anyhow::anyhow!(
                "{}",
                confirmation
                    .error
                    .unwrap_or_else(|| "booking site rejected the request".to_string())
            ));
        }
        Ok(confirmation.message)
    }
}

fn box_query(box_number: Option<u32>) -> Vec<(&'static str, String)> {
    box_number
        .map(|n| vec![("box", n.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl AvailabilitySource for HttpBookingSite {
    async fn fetch(&self, date: Option<&str>) -> Result<AvailabilitySnapshot> {
        let query: Vec<(&str, String)> = date.map(|d| vec![("date", d.to_string())]).unwrap_or_default();
        self.get_json("/availability", &query).await
    }
}

#[async_trait]
impl BookingGateway for HttpBookingSite {
    async fn book(&self, request: &SlotRequest) -> Result<String> {
        self.post_slot("/bookings", request).await
    }

    async fn cancel(&self, request: &SlotRequest) -> Result<String> {
        self.post_slot("/cancellations", request).await
    }
}

#[async_trait]
impl BoxLeagueSource for HttpBookingSite {
    async fn positions(&self, box_number: Option<u32>) -> Result<Vec<BoxTable>> {
        self.get_json("/boxes/positions", &box_query(box_number)).await
    }

    async fn results(&self, box_number: Option<u32>) -> Result<Vec<BoxResult>> {
        self.get_json("/boxes/results", &box_query(box_number)).await
    }
}

// =============================================================================
// STATIC SOURCES
// =============================================================================

/// Fixed snapshots keyed by date
#[derive(Debug, Clone, Default)]
pub struct StaticAvailabilitySource {
    by_date: HashMap<String, AvailabilitySnapshot>,
    default: Option<AvailabilitySnapshot>,
}

impl StaticAvailabilitySource {
    /// Serve `snapshot` for every date
    pub fn single(snapshot: AvailabilitySnapshot) -> Self {
        Self {
            by_date: HashMap::new(),
            default: Some(snapshot),
        }
    }

    /// Serve each snapshot for its own date; the first one doubles as the
    /// answer for dates that are not listed.
    pub fn from_snapshots(snapshots: Vec<AvailabilitySnapshot>) -> Self {
        let default = snapshots.first().cloned();
        let by_date = snapshots
            .into_iter()
            .map(|s| (s.date.to_lowercase(), s))
            .collect();
        Self { by_date, default }
    }
}

#[async_trait]
impl AvailabilitySource for StaticAvailabilitySource {
    async fn fetch(&self, date: Option<&str>) -> Result<AvailabilitySnapshot> {
        let found = date.and_then(|d| self.by_date.get(&d.to_lowercase()));
        let mut snapshot = found
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_default();
        if let Some(d) = date {
            snapshot.date = d.to_string();
        }
        Ok(snapshot)
    }
}

/// Fixed box tables and results
#[derive(Debug, Clone, Default)]
pub struct StaticBoxLeague {
    tables: Vec<BoxTable>,
    results: Vec<BoxResult>,
}

impl StaticBoxLeague {
    pub fn new(tables: Vec<BoxTable>, results: Vec<BoxResult>) -> Self {
        Self { tables, results }
    }
}

fn box_matches(name: &str, box_number: Option<u32>) -> bool {
    match box_number {
        None => true,
        Some(n) => name
            .split_whitespace()
            .last()
            .and_then(|tail| tail.parse::<u32>().ok())
            == Some(n),
    }
}

#[async_trait]
impl BoxLeagueSource for StaticBoxLeague {
    async fn positions(&self, box_number: Option<u32>) -> Result<Vec<BoxTable>> {
        Ok(self
            .tables
            .iter()
            .filter(|t| box_matches(&t.name, box_number))
            .cloned()
            .collect())
    }

    async fn results(&self, box_number: Option<u32>) -> Result<Vec<BoxResult>> {
        Ok(self
            .results
            .iter()
            .filter(|r| box_matches(&r.box_name, box_number))
            .cloned()
            .collect())
    }
}

/// Gateway that confirms without contacting the booking site
#[derive(Debug, Clone, Default)]
pub struct DryRunBookingGateway;

fn describe(request: &SlotRequest) -> String {
    let mut text = format!("{} at {}", request.date, request.time);
    if let Some(court) = request.court {
        text.push_str(&format!(" on Court {}", court));
    }
    if let Some(player) = &request.player {
        text.push_str(&format!(" for {}", player));
    }
    text
}

#[async_trait]
impl BookingGateway for DryRunBookingGateway {
    async fn book(&self, request: &SlotRequest) -> Result<String> {
        Ok(format!("Dry run: would book {}", describe(request)))
    }

    async fn cancel(&self, request: &SlotRequest) -> Result<String> {
        Ok(format!("Dry run: would cancel {}", describe(request)))
    }
}

// =============================================================================
// FIXTURE FILES
// =============================================================================

/// Offline data set loaded from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub availability: Vec<AvailabilitySnapshot>,
    #[serde(default)]
    pub boxes: Vec<BoxTable>,
    #[serde(default)]
    pub results: Vec<BoxResult>,
}

impl Fixture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))?;
        info!(
            "Loaded fixture {} ({} days, {} boxes, {} results)",
            path.display(),
            fixture.availability.len(),
            fixture.boxes.len(),
            fixture.results.len()
        );
        Ok(fixture)
    }

    pub fn availability_source(&self) -> StaticAvailabilitySource {
        StaticAvailabilitySource::from_snapshots(self.availability.clone())
    }

    pub fn box_league(&self) -> StaticBoxLeague {
        StaticBoxLeague::new(self.boxes.clone(), self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{Cell, Court, PlayerStanding};
    use std::io::Write;

    fn day(date: &str, player: &str) -> AvailabilitySnapshot {
        AvailabilitySnapshot::new(
            date,
            vec![Court::new("Court 1", vec![Cell::booked("18:15 - 19:00", player)])],
        )
    }

    #[tokio::test]
    async fn test_static_source_by_date() {
        let source = StaticAvailabilitySource::from_snapshots(vec![
            day("20 Oct 26", "Alice vs Bob"),
            day("21 Oct 26", "Carol vs Dan"),
        ]);

        let snapshot = source.fetch(Some("21 oct 26")).await.unwrap();
        assert_eq!(snapshot.courts[0].cells[0].player, "Carol vs Dan");

        let fallback = source.fetch(Some("25 Oct 26")).await.unwrap();
        assert_eq!(fallback.date, "25 Oct 26");
        assert_eq!(fallback.courts[0].cells[0].player, "Alice vs Bob");

        let today = source.fetch(None).await.unwrap();
        assert_eq!(today.date, "20 Oct 26");
    }

    #[tokio::test]
    async fn test_empty_static_source() {
        let snapshot = StaticAvailabilitySource::default()
            .fetch(Some("20 Oct 26"))
            .await
            .unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.date, "20 Oct 26");
    }

    #[tokio::test]
    async fn test_static_box_league_filters_by_number() {
        let league = StaticBoxLeague::new(
            vec![
                BoxTable {
                    name: "Box 1".to_string(),
                    players: vec![],
                },
                BoxTable {
                    name: "Box 2".to_string(),
                    players: vec![],
                },
            ],
            vec![],
        );
        assert_eq!(league.positions(None).await.unwrap().len(), 2);
        let second = league.positions(Some(2)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "Box 2");
    }

    #[tokio::test]
    async fn test_dry_run_gateway() {
        let request = SlotRequest {
            date: "20 Oct 26".to_string(),
            time: "18:00".to_string(),
            court: Some(2),
            player: None,
        };
        let text = DryRunBookingGateway.book(&request).await.unwrap();
        assert_eq!(text, "Dry run: would book 20 Oct 26 at 18:00 on Court 2");
    }

    #[test]
    fn test_fixture_load() {
        let fixture = Fixture {
            availability: vec![day("20 Oct 26", "Alice vs Bob")],
            boxes: vec![BoxTable {
                name: "Box 1".to_string(),
                players: vec![PlayerStanding {
                    name: "Alice Smith".to_string(),
                    played: 3,
                    won: 2,
                    lost: 1,
                    points: 11,
                }],
            }],
            results: vec![],
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&fixture).unwrap()).unwrap();

        let loaded = Fixture::load(file.path()).unwrap();
        assert_eq!(loaded.availability.len(), 1);
        assert_eq!(loaded.boxes[0].players[0].points, 11);
    }

    #[test]
    fn test_fixture_load_reports_path() {
        let err = Fixture::load("/nonexistent/fixture.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fixture.json"));
    }
}
