//! Active weather alerts from the NWS alerting service.
//!
//! Alerts are cosmetic enrichment: any failure here degrades silently to
//! "no alerts" and never aborts a scan, unlike the weather archive.

use crate::WidgetError;
use crate::models::{Alert, AlertSeverity, Coordinates};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const NWS_BASE_URL: &str = "https://api.weather.gov";
const REQUEST_TIMEOUT_SECS: u64 = 10;
// NWS requires an identifying client header
const USER_AGENT: &str = "StormScan/0.1.0 (support@stormscan.example)";

/// Most alerts shown per scan
pub const MAX_ALERTS: usize = 3;

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
struct AlertProperties {
    event: String,
    headline: Option<String>,
    #[serde(default)]
    severity: AlertSeverity,
    urgency: Option<String>,
    expires: Option<DateTime<Utc>>,
    description: Option<String>,
}

impl From<AlertProperties> for Alert {
    fn from(props: AlertProperties) -> Self {
        Alert {
            event: props.event,
            headline: props.headline,
            severity: props.severity,
            urgency: props.urgency,
            expires: props.expires,
            description: props.description,
        }
    }
}

/// Client for the active-alerts service
#[derive(Debug, Clone)]
pub struct AlertsClient {
    client: Client,
    base_url: String,
}

impl AlertsClient {
    /// Create a client against the public NWS endpoint
    pub fn new() -> Result<Self, WidgetError> {
        Self::with_base_url(NWS_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, WidgetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch up to [`MAX_ALERTS`] active alerts for a location.
    ///
    /// Infallible by design: failures are logged and absorbed into an
    /// empty list so the scan can proceed.
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    pub async fn active_alerts(&self, coords: &Coordinates) -> Vec<Alert> {
        match self.fetch_alerts(coords).await {
            Ok(alerts) => {
                info!("Found {} active alert(s)", alerts.len());
                alerts
            }
            Err(e) => {
                warn!("Alerts fetch failed, continuing without alerts: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_alerts(&self, coords: &Coordinates) -> Result<Vec<Alert>, WidgetError> {
        let url = format!(
            "{}/alerts/active?point={}",
            self.base_url,
            coords.point_param()
        );
        debug!("Alerts request URL: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(WidgetError::general(format!(
                "alerts service returned status {}",
                response.status()
            )));
        }

        let body: AlertsResponse = response.json().await?;

        Ok(body
            .features
            .into_iter()
            .take(MAX_ALERTS)
            .map(|feature| feature.properties.into())
            .collect())
    }
}

/// Format an alert expiry relative to `now` for display.
///
/// Under an hour reads "expiring soon", same-day expiries show the clock
/// time, anything later shows the weekday and hour.
#[must_use]
pub fn format_expiry(expires: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(expires) = expires else {
        return String::new();
    };

    let diff_hours = (expires - now).num_minutes() as f64 / 60.0;
    let diff_hours = diff_hours.round() as i64;

    if diff_hours < 1 {
        "expiring soon".to_string()
    } else if diff_hours < 24 {
        format!("until {}", expires.format("%-I:%M %p"))
    } else {
        format!("until {}", expires.format("%a %-I %p"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_feature_json(count: usize) -> String {
        let feature = r#"{
            "properties": {
                "event": "Severe Thunderstorm Warning",
                "headline": "Severe Thunderstorm Warning until 6 PM",
                "severity": "Severe",
                "urgency": "Immediate",
                "expires": "2026-08-23T18:00:00Z",
                "description": "Damaging winds expected."
            }
        }"#;
        let features = vec![feature; count].join(",");
        format!(r#"{{"features": [{features}]}}"#)
    }

    #[test]
    fn test_alerts_capped_at_three_preserving_order() {
        let body: AlertsResponse = serde_json::from_str(&sample_feature_json(5)).unwrap();
        let alerts: Vec<Alert> = body
            .features
            .into_iter()
            .take(MAX_ALERTS)
            .map(|f| f.properties.into())
            .collect();
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].event, "Severe Thunderstorm Warning");
        assert_eq!(alerts[0].severity, AlertSeverity::Severe);
    }

    #[test]
    fn test_empty_feature_list_parses() {
        let body: AlertsResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(body.features.is_empty());
    }

    #[test]
    fn test_missing_optional_properties_parse() {
        let body: AlertsResponse = serde_json::from_str(
            r#"{"features": [{"properties": {"event": "Flood Watch"}}]}"#,
        )
        .unwrap();
        let alert: Alert = body.features.into_iter().next().unwrap().properties.into();
        assert_eq!(alert.event, "Flood Watch");
        assert_eq!(alert.severity, AlertSeverity::Unknown);
        assert!(alert.expires.is_none());
    }

    #[test]
    fn test_format_expiry_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();

        assert_eq!(format_expiry(None, now), "");
        assert_eq!(
            format_expiry(Some(now + chrono::Duration::minutes(20)), now),
            "expiring soon"
        );

        let same_day = format_expiry(Some(now + chrono::Duration::hours(5)), now);
        assert_eq!(same_day, "until 5:00 PM");

        let later = format_expiry(Some(now + chrono::Duration::days(2)), now);
        assert_eq!(later, "until Tue 12 PM");
    }
}
