//! Historical weather extremes via the Open-Meteo archive API.
//!
//! Fetches the daily wind/precipitation/snowfall series for the trailing
//! 365 days and reduces each to its peak, converted to imperial units.
//! A failure here is fatal to the scan; there is no retry.

use crate::WidgetError;
use crate::models::{Coordinates, WeatherExtremes};
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "StormScan/0.1.0 (support@stormscan.example)";

/// Trailing window length in days
const WINDOW_DAYS: i64 = 365;

/// km/h to mph
const KMH_TO_MPH: f64 = 0.621371;
/// mm to inches
const MM_TO_IN: f64 = 0.0393701;
/// cm to inches
const CM_TO_IN: f64 = 0.393701;

/// Archive response from Open-Meteo
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailySeries>,
}

/// Daily series; individual days can be null when a station has gaps
#[derive(Debug, Deserialize)]
struct DailySeries {
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    snowfall_sum: Vec<Option<f64>>,
}

/// Client for the historical weather archive
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    /// Create a client against the public Open-Meteo archive endpoint
    pub fn new() -> Result<Self, WidgetError> {
        Self::with_base_url(ARCHIVE_BASE_URL)
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

    /// Fetch the 12-month peak wind/rain/snow extremes for a location.
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    pub async fn extremes(&self, coords: &Coordinates) -> Result<WeatherExtremes, WidgetError> {
        let end_date = Utc::now().date_naive();
        let start_date = end_date - ChronoDuration::days(WINDOW_DAYS);

        let url = format!(
            "{}/v1/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily=wind_speed_10m_max,precipitation_sum,snowfall_sum&timezone=auto",
            self.base_url, coords.latitude, coords.longitude, start_date, end_date
        );
        debug!("Archive request URL: {}", url);

        let start_time = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WidgetError::weather(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Archive returned status {}", response.status());
            return Err(WidgetError::weather(format!(
                "archive returned status {}",
                response.status()
            )));
        }

        let body: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| WidgetError::weather(format!("malformed response: {e}")))?;

        let daily = body
            .daily
            .ok_or_else(|| WidgetError::weather("missing daily series"))?;

        let extremes = extremes_from_series(&daily)?;
        let total_duration = start_time.elapsed();

        info!(
            "Fetched 12-month extremes in {:.3}s: wind {} mph, rain {}\", snow {}\"",
            total_duration.as_secs_f64(),
            extremes.wind_mph,
            extremes.rain_in,
            extremes.snow_in
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow archive response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(extremes)
    }
}

/// Reduce the daily series to peak imperial values.
fn extremes_from_series(daily: &DailySeries) -> Result<WeatherExtremes, WidgetError> {
    let max_wind_kmh = series_max(&daily.wind_speed_10m_max)
        .ok_or_else(|| WidgetError::weather("empty wind series"))?;
    let max_rain_mm = series_max(&daily.precipitation_sum)
        .ok_or_else(|| WidgetError::weather("empty precipitation series"))?;
    let max_snow_cm = series_max(&daily.snowfall_sum)
        .ok_or_else(|| WidgetError::weather("empty snowfall series"))?;

    Ok(WeatherExtremes {
        wind_mph: round_to(max_wind_kmh * KMH_TO_MPH, 1),
        rain_in: round_to(max_rain_mm * MM_TO_IN, 2),
        snow_in: round_to(max_snow_cm * CM_TO_IN, 1),
    })
}

/// Maximum over a series, skipping nulls. None when nothing usable remains.
fn series_max(series: &[Option<f64>]) -> Option<f64> {
    series
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.max(v)))
        })
}

/// Round to a fixed number of decimal places
fn round_to(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    (value * multiplier).round() / multiplier
}
