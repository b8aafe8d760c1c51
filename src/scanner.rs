//! Scan orchestration: ZIP validation, geocoding, the concurrent
//! weather/alerts fetch, scoring, and the per-session state machine.

use crate::WidgetError;
use crate::alerts::AlertsClient;
use crate::config::WidgetConfig;
use crate::geocode::{GeocodeClient, validate_zip};
use crate::models::ScanReport;
use crate::risk::assess_risk;
use crate::stats::estimate_local_damage;
use crate::weather::ArchiveClient;
use std::time::Duration;
use tracing::{info, instrument};

/// Cosmetic progress plan shown while a scan runs. Deterministic and
/// decoupled from actual network completion: four steps of 25% on a fixed
/// cadence, then the result is held back a flat delay before display.
pub const PROGRESS_STEP_PERCENT: u8 = 25;
pub const PROGRESS_CADENCE: Duration = Duration::from_millis(500);
pub const RESULT_DISPLAY_DELAY: Duration = Duration::from_secs(2);
pub const PROGRESS_MESSAGES: [&str; 4] = [
    "Locating coordinates...",
    "Accessing NOAA servers...",
    "Analyzing 12-month data...",
    "Generating report...",
];

/// The (percent, message) schedule for the scanning animation
pub fn progress_plan() -> impl Iterator<Item = (u8, &'static str)> {
    PROGRESS_MESSAGES
        .iter()
        .enumerate()
        .map(|(i, &msg)| ((i as u8 + 1) * PROGRESS_STEP_PERCENT, msg))
}

/// Presentation state for one scan session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    /// Waiting for a ZIP code
    #[default]
    Input,
    /// A scan is in flight
    Scanning,
    /// A scan completed and its report is on display
    Results(Box<ScanReport>),
}

/// Ephemeral per-invocation state owned by the widget instance.
///
/// Replaced on the next scan, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    /// Current presentation state
    pub state: ScanState,
    /// Whether the modal overlay is open (floating mode only)
    pub modal_open: bool,
    /// Error to surface on the input state, if the last scan failed
    pub last_error: Option<String>,
    /// ZIP of the last scan attempt
    pub zip: Option<String>,
}

impl ScanSession {
    /// Return to the input state, optionally carrying an error message
    pub fn reset(&mut self, error: Option<String>) {
        self.state = ScanState::Input;
        self.last_error = error;
    }
}

/// Runs the scan pipeline against the three external services
#[derive(Debug, Clone)]
pub struct Scanner {
    config: WidgetConfig,
    geocode: GeocodeClient,
    weather: ArchiveClient,
    alerts: AlertsClient,
}

impl Scanner {
    /// Create a scanner against the public service endpoints
    pub fn new(config: WidgetConfig) -> Result<Self, WidgetError> {
        Ok(Self {
            config,
            geocode: GeocodeClient::new()?,
            weather: ArchiveClient::new()?,
            alerts: AlertsClient::new()?,
        })
    }

    /// Create a scanner with injected clients (used by tests)
    pub fn with_clients(
        config: WidgetConfig,
        geocode: GeocodeClient,
        weather: ArchiveClient,
        alerts: AlertsClient,
    ) -> Self {
        Self {
            config,
            geocode,
            weather,
            alerts,
        }
    }

    /// Run one full scan for a raw ZIP input.
    ///
    /// Geocoding failure aborts before the weather or alerts clients are
    /// ever called. Weather and alerts are then fetched concurrently:
    /// a weather failure is fatal even when alerts succeeded, while an
    /// alerts failure is absorbed into an empty list.
    #[instrument(skip(self))]
    pub async fn run(&self, raw_zip: &str) -> Result<ScanReport, WidgetError> {
        let zip = validate_zip(raw_zip)?;

        let coords = self.geocode.geocode_zip(&zip).await?;

        let (extremes, alerts) = tokio::join!(
            self.weather.extremes(&coords),
            self.alerts.active_alerts(&coords)
        );
        let extremes = extremes?;

        let risk = assess_risk(&extremes, &self.config.thresholds)?;
        let stats = estimate_local_damage(risk.score, &zip, &mut rand::rng());

        info!(
            "Scan complete for ZIP {}: score {} ({:?}), {} alert(s)",
            zip,
            risk.score,
            risk.tier,
            alerts.len()
        );

        Ok(ScanReport {
            zip,
            extremes,
            alerts,
            risk,
            stats,
        })
    }
}
