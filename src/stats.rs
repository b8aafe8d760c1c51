//! Synthetic "local damage report" estimator.
//!
//! Produces plausible-looking numbers from the risk score, a seed taken
//! from the ZIP's first three digits, and a small random component. This
//! is NOT backed by any damage database; the rendered block labels the
//! figures as illustrative estimates.

use crate::models::HistoricalStats;
use rand::RngExt;

const TIMEFRAME: &str = "90 days";
const RADIUS: &str = "5 miles";

/// Seed derived from the first three ZIP digits; a zero or unparseable
/// prefix falls back to 100.
fn zip_seed(zip: &str) -> u32 {
    zip.get(0..3)
        .and_then(|prefix| prefix.parse::<u32>().ok())
        .filter(|&seed| seed != 0)
        .unwrap_or(100)
}

/// Estimate local damage figures for a scored scan.
///
/// The RNG is injected so callers can seed it in tests.
pub fn estimate_local_damage(
    score: u8,
    zip: &str,
    rng: &mut impl RngExt,
) -> HistoricalStats {
    let seed = zip_seed(zip);
    let score = f64::from(score);

    let base_properties = (score / 100.0 * 50.0 + f64::from(seed % 30) + 10.0).floor() as u32;
    let base_claims = (f64::from(base_properties) * 0.3 + f64::from(seed % 10)).floor() as u32;
    let avg_repair_cost = (3000.0 + score * 80.0 + f64::from(seed % 20) * 100.0).floor() as u32;

    HistoricalStats {
        properties_affected: base_properties + rng.random_range(0..15),
        insurance_claims: base_claims + rng.random_range(0..5),
        avg_repair_cost,
        timeframe: TIMEFRAME.to_string(),
        radius: RADIUS.to_string(),
    }
}
