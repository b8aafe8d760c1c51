//! StormScan: an embeddable storm damage scan widget.
//!
//! Takes a visitor's US ZIP code, geocodes it, pulls 12 months of daily
//! weather extremes plus any active alerts, scores storm damage risk with
//! a weighted heuristic, and renders a lead-generation report. One widget
//! instance per embedding; presentation is either a floating badge that
//! opens a modal or an inline card.

pub mod alerts;
pub mod config;
pub mod email;
pub mod error;
pub mod geocode;
pub mod models;
pub mod render;
pub mod risk;
pub mod routing;
pub mod scanner;
pub mod stats;
pub mod weather;
pub mod web;
pub mod widget;

pub use config::{StormScanConfig, WidgetConfig};
pub use error::WidgetError;
pub use models::{RiskAssessment, RiskTier, ScanReport, WeatherExtremes};
pub use render::RenderTarget;
pub use scanner::Scanner;
pub use widget::StormScanWidget;

/// Crate result alias
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
