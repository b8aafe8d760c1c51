//! Configuration management for the `StormScan` widget
//!
//! Handles loading the embedding page's configuration object from a file
//! and environment variables, and provides validation for all settings.

use crate::WidgetError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `StormScan` service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StormScanConfig {
    /// Widget presentation and scoring configuration
    #[serde(default)]
    pub widget: WidgetConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vertical the embedding business operates in; selects the damage copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    #[default]
    Roofer,
    TreeService,
    Landscaper,
    Contractor,
    Restoration,
}

/// How the widget is presented on the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Floating badge that opens a modal overlay
    #[default]
    Floating,
    /// Card rendered directly in the page flow
    Inline,
}

/// Which side of the viewport the floating badge sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BadgePosition {
    Left,
    #[default]
    Right,
}

/// Per-metric thresholds the risk score is weighted against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Peak wind threshold in mph
    #[serde(default = "default_wind_threshold")]
    pub wind: f64,
    /// Peak rain threshold in inches
    #[serde(default = "default_rain_threshold")]
    pub rain: f64,
    /// Peak snow threshold in inches
    #[serde(default = "default_snow_threshold")]
    pub snow: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            wind: default_wind_threshold(),
            rain: default_rain_threshold(),
            snow: default_snow_threshold(),
        }
    }
}

/// Widget configuration supplied once by the embedding page.
///
/// Immutable after initialization; every default matches the stock widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Industry tag used for the loss-aversion copy
    #[serde(default)]
    pub industry: Industry,
    /// Floating modal or inline card
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Floating badge position
    #[serde(default)]
    pub badge_position: BadgePosition,
    /// Headline shown on the input state
    #[serde(default = "default_headline")]
    pub headline: String,
    /// Subheadline shown under the headline
    #[serde(default = "default_subheadline")]
    pub subheadline: String,
    /// Headline text color (hex)
    #[serde(default = "default_headline_color")]
    pub headline_color: String,
    /// Accent color used for buttons and highlights (hex)
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    /// Widget theme name
    #[serde(default = "default_widget_theme")]
    pub widget_theme: String,
    /// Hook text shown in the floating badge bubble
    #[serde(default = "default_hook_text")]
    pub hook_text: String,
    /// Risk score thresholds (wind mph, rain in, snow in)
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Optional raw lead-capture form embed HTML containing an iframe
    #[serde(default)]
    pub ghl_form_embed: Option<String>,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_headline() -> String {
    "Check Your Property Status".to_string()
}

fn default_subheadline() -> String {
    "Free storm damage report using historical weather data".to_string()
}

fn default_headline_color() -> String {
    "#000000".to_string()
}

fn default_theme_color() -> String {
    "#00d4aa".to_string()
}

fn default_widget_theme() -> String {
    "light".to_string()
}

fn default_hook_text() -> String {
    "Roof Damage Scan".to_string()
}

fn default_wind_threshold() -> f64 {
    60.0
}

fn default_rain_threshold() -> f64 {
    1.5
}

fn default_snow_threshold() -> f64 {
    12.0
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            industry: Industry::default(),
            display_mode: DisplayMode::default(),
            badge_position: BadgePosition::default(),
            headline: default_headline(),
            subheadline: default_subheadline(),
            headline_color: default_headline_color(),
            theme_color: default_theme_color(),
            widget_theme: default_widget_theme(),
            hook_text: default_hook_text(),
            thresholds: Thresholds::default(),
            ghl_form_embed: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl StormScanConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides with STORMSCAN_ prefix, e.g.
        // STORMSCAN_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("STORMSCAN")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: StormScanConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stormscan").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.widget.validate()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WidgetError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WidgetError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

impl WidgetConfig {
    /// Validate widget settings
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        for (field, value) in [
            ("headline_color", &self.headline_color),
            ("theme_color", &self.theme_color),
        ] {
            if !is_hex_color(value) {
                return Err(WidgetError::config(format!(
                    "{field} must be a hex color like #00d4aa, got '{value}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}

impl Thresholds {
    /// Validate that every threshold is a positive finite number
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("wind", self.wind),
            ("rain", self.rain),
            ("snow", self.snow),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WidgetError::config(format!(
                    "Threshold '{name}' must be a positive number, got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
