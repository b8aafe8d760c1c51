//! ZIP code geocoding via the Nominatim postal-code lookup.
//!
//! Free, no API key required. One request, first match wins, no retry.

use crate::WidgetError;
use crate::models::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "StormScan/0.1.0 (support@stormscan.example)";

/// A single Nominatim search result; lat/lon arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Validate a raw ZIP input before any network call.
///
/// The caller contract is length >= 5 ASCII digits; anything else is a
/// validation error with the visitor-facing message baked in.
pub fn validate_zip(input: &str) -> Result<String, WidgetError> {
    let zip = input.trim();
    if zip.len() >= 5 && zip.chars().all(|c| c.is_ascii_digit()) {
        Ok(zip.to_string())
    } else {
        Err(WidgetError::validation(
            "Please enter a valid US ZIP code.",
        ))
    }
}

/// Client for the public postal-code lookup service
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl GeocodeClient {
    /// Create a client against the public Nominatim endpoint
    pub fn new() -> Result<Self, WidgetError> {
        Self::with_base_url(NOMINATIM_BASE_URL)
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

    /// Look up coordinates for a validated US ZIP code.
    ///
    /// Takes the first match. Zero matches, transport errors, and malformed
    /// responses all collapse into the same geocode failure.
    #[instrument(skip(self))]
    pub async fn geocode_zip(&self, zip: &str) -> Result<Coordinates, WidgetError> {
        let url = format!(
            "{}/search?postalcode={}&country=US&format=json&limit=1",
            self.base_url,
            urlencoding::encode(zip)
        );
        debug!("Geocoding request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WidgetError::geocode(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Geocoder returned status {}", response.status());
            return Err(WidgetError::geocode(format!(
                "lookup returned status {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| WidgetError::geocode(format!("malformed response: {e}")))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| WidgetError::geocode(format!("no match for ZIP {zip}")))?;

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| WidgetError::geocode(format!("unparseable latitude '{}'", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| WidgetError::geocode(format!("unparseable longitude '{}'", place.lon)))?;

        info!(
            "Geocoded ZIP {} to ({:.4}, {:.4})",
            zip, latitude, longitude
        );

        Ok(Coordinates::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("60601")]
    #[case("  60601  ")]
    #[case("606011234")]
    fn test_validate_zip_accepts(#[case] input: &str) {
        let zip = validate_zip(input).unwrap();
        assert!(zip.chars().all(|c| c.is_ascii_digit()));
        assert!(zip.len() >= 5);
    }

    #[rstest]
    #[case("")]
    #[case("1234")]
    #[case("12a45")]
    #[case("ABCDE")]
    #[case("12 45")]
    fn test_validate_zip_rejects(#[case] input: &str) {
        let err = validate_zip(input).unwrap_err();
        assert!(matches!(err, WidgetError::Validation { .. }));
        assert_eq!(err.user_message(), "Please enter a valid US ZIP code.");
    }

    #[test]
    fn test_validate_zip_trims() {
        assert_eq!(validate_zip(" 60601 ").unwrap(), "60601");
    }
}
