//! Core data model for scans: coordinates, weather extremes, alerts,
//! risk assessments, and the synthetic local damage stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates derived from a ZIP code.
///
/// Discarded after the weather and alerts fetch; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a "lat,lon" point parameter
    #[must_use]
    pub fn point_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Peak weather values over the trailing 365-day window, already converted
/// to imperial units and rounded for display (wind 1 decimal, rain 2, snow 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherExtremes {
    /// Maximum daily wind speed in mph
    pub wind_mph: f64,
    /// Maximum daily precipitation sum in inches
    pub rain_in: f64,
    /// Maximum daily snowfall sum in inches
    pub snow_in: f64,
}

/// Alert severity tier as reported by the alerting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlertSeverity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Display palette for an alert severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPalette {
    pub bg: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl AlertSeverity {
    /// Severity display colors; anything unrecognized renders like Minor.
    #[must_use]
    pub fn palette(&self) -> AlertPalette {
        match self {
            AlertSeverity::Extreme => AlertPalette {
                bg: "#7f1d1d",
                border: "#dc2626",
                text: "#fecaca",
            },
            AlertSeverity::Severe => AlertPalette {
                bg: "#991b1b",
                border: "#ef4444",
                text: "#fecaca",
            },
            AlertSeverity::Moderate => AlertPalette {
                bg: "#92400e",
                border: "#f59e0b",
                text: "#fef3c7",
            },
            AlertSeverity::Minor | AlertSeverity::Unknown => AlertPalette {
                bg: "#1e40af",
                border: "#3b82f6",
                text: "#dbeafe",
            },
        }
    }
}

/// An active weather advisory for the scanned location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Event name, e.g. "Severe Thunderstorm Warning"
    pub event: String,
    /// Full advisory headline
    pub headline: Option<String>,
    /// Severity tier
    pub severity: AlertSeverity,
    /// Urgency, e.g. "Immediate"
    pub urgency: Option<String>,
    /// Expiry timestamp
    pub expires: Option<DateTime<Utc>>,
    /// Long-form description
    pub description: Option<String>,
}

/// Risk classification bucket derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Display styling attributes for a risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskStyle {
    pub label: &'static str,
    pub icon: &'static str,
    pub bg_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub score_color: &'static str,
}

impl RiskTier {
    /// Tier for a given score; boundaries are 40 and 70 inclusive.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            RiskTier::High
        } else if score >= 40 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Medium and high tiers trigger the loss-aversion and urgency blocks.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::Medium | RiskTier::High)
    }

    /// Display styling for the tier
    #[must_use]
    pub fn style(&self) -> RiskStyle {
        match self {
            RiskTier::High => RiskStyle {
                label: "HIGH RISK - IMMEDIATE ACTION REQUIRED",
                icon: "\u{1F534}",
                bg_color: "rgba(239, 68, 68, 0.15)",
                border_color: "#dc2626",
                text_color: "#991b1b",
                score_color: "#dc2626",
            },
            RiskTier::Medium => RiskStyle {
                label: "MEDIUM RISK - ACTION RECOMMENDED",
                icon: "\u{1F7E0}",
                bg_color: "rgba(251, 191, 36, 0.15)",
                border_color: "#f59e0b",
                text_color: "#92400e",
                score_color: "#f59e0b",
            },
            RiskTier::Low => RiskStyle {
                label: "LOW RISK - PREVENTIVE MAINTENANCE SUGGESTED",
                icon: "\u{2705}",
                bg_color: "rgba(16, 185, 129, 0.15)",
                border_color: "#10b981",
                text_color: "#065f46",
                score_color: "#10b981",
            },
        }
    }
}

/// Risk score and tier; purely a function of the weather extremes and the
/// configured thresholds, no independent lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Weighted score, 0-100
    pub score: u8,
    /// Derived classification bucket
    pub tier: RiskTier,
}

/// Synthetic "local damage report" numbers.
///
/// These are illustrative estimates derived from the risk score and a
/// ZIP-digit seed, not measurements from any damage database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalStats {
    /// Estimated properties reporting weather damage nearby
    pub properties_affected: u32,
    /// Estimated insurance claims filed nearby
    pub insurance_claims: u32,
    /// Estimated average repair cost in dollars
    pub avg_repair_cost: u32,
    /// Reporting window label
    pub timeframe: String,
    /// Reporting radius label
    pub radius: String,
}

/// Everything a completed scan produced, in one immutable bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// ZIP code the visitor submitted
    pub zip: String,
    /// Peak weather values over the trailing year
    pub extremes: WeatherExtremes,
    /// Active alerts, capped at three, API order preserved
    pub alerts: Vec<Alert>,
    /// Derived risk score and tier
    pub risk: RiskAssessment,
    /// Illustrative local damage estimates
    pub stats: HistoricalStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_param() {
        let coords = Coordinates::new(41.88, -87.63);
        assert_eq!(coords.point_param(), "41.88,-87.63");
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(39), RiskTier::Low);
        assert_eq!(RiskTier::from_score(40), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(69), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(70), RiskTier::High);
        assert_eq!(RiskTier::from_score(100), RiskTier::High);
    }

    #[test]
    fn test_elevated_tiers() {
        assert!(!RiskTier::Low.is_elevated());
        assert!(RiskTier::Medium.is_elevated());
        assert!(RiskTier::High.is_elevated());
    }

    #[test]
    fn test_unknown_severity_renders_like_minor() {
        assert_eq!(
            AlertSeverity::Unknown.palette(),
            AlertSeverity::Minor.palette()
        );
    }

    #[test]
    fn test_severity_deserializes_unrecognized_as_unknown() {
        let severity: AlertSeverity = serde_json::from_str("\"Apocalyptic\"").unwrap();
        assert_eq!(severity, AlertSeverity::Unknown);

        let severity: AlertSeverity = serde_json::from_str("\"Extreme\"").unwrap();
        assert_eq!(severity, AlertSeverity::Extreme);
    }
}
