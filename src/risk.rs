//! Storm risk scoring.
//!
//! A pure weighted formula over the three weather extremes: wind carries
//! 40 points at its threshold, rain 35, snow 25, clamped to 100.

use crate::WidgetError;
use crate::config::Thresholds;
use crate::models::{RiskAssessment, RiskTier, WeatherExtremes};

const WIND_WEIGHT: f64 = 40.0;
const RAIN_WEIGHT: f64 = 35.0;
const SNOW_WEIGHT: f64 = 25.0;

/// Compute the 0-100 risk score and tier for a set of extremes.
///
/// Monotonic in each input; 0 when every extreme is 0; saturates at 100.
/// Negative or non-finite extremes are rejected rather than coerced.
pub fn assess_risk(
    extremes: &WeatherExtremes,
    thresholds: &Thresholds,
) -> Result<RiskAssessment, WidgetError> {
    thresholds
        .validate()
        .map_err(|e| WidgetError::validation(e.to_string()))?;

    for (name, value) in [
        ("wind", extremes.wind_mph),
        ("rain", extremes.rain_in),
        ("snow", extremes.snow_in),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(WidgetError::validation(format!(
                "Extreme '{name}' must be a non-negative number, got {value}"
            )));
        }
    }

    let wind_score = extremes.wind_mph / thresholds.wind * WIND_WEIGHT;
    let rain_score = extremes.rain_in / thresholds.rain * RAIN_WEIGHT;
    let snow_score = extremes.snow_in / thresholds.snow * SNOW_WEIGHT;

    let score = (wind_score + rain_score + snow_score).min(100.0).round() as u8;

    Ok(RiskAssessment {
        score,
        tier: RiskTier::from_score(score),
    })
}
