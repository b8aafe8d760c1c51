//! Error types and handling for the `StormScan` widget

use thiserror::Error;

/// Main error type for the `StormScan` widget
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// ZIP geocoding failed: no match, or the lookup service was unreachable
    #[error("Geocoding error: {message}")]
    Geocode { message: String },

    /// Weather archive failed: missing series, or the archive was unreachable
    #[error("Weather data error: {message}")]
    Weather { message: String },

    /// Email delivery errors
    #[error("Email error: {message}")]
    Email { message: String },

    /// HTTP client construction or transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WidgetError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Self::Geocode {
            message: message.into(),
        }
    }

    /// Create a new weather data error
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::Weather {
            message: message.into(),
        }
    }

    /// Create a new email error
    pub fn email<S: Into<String>>(message: S) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message.
    ///
    /// "Service unreachable" and "service returned no result" deliberately
    /// collapse into the same generic string for geocoding and weather
    /// failures; the visitor-facing copy does not distinguish them.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WidgetError::Config { .. } => {
                "Configuration error. Please check the widget configuration.".to_string()
            }
            WidgetError::Validation { message } => message.clone(),
            WidgetError::Geocode { .. } => {
                "Could not find that ZIP code. Please try again.".to_string()
            }
            WidgetError::Weather { .. } => {
                "Could not fetch weather data. Please try again.".to_string()
            }
            WidgetError::Email { .. } => {
                "Could not send the report. Please try again later.".to_string()
            }
            WidgetError::Http { .. } => {
                "Unable to connect to external services. Please try again.".to_string()
            }
            WidgetError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WidgetError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WidgetError::config("missing thresholds");
        assert!(matches!(config_err, WidgetError::Config { .. }));

        let geocode_err = WidgetError::geocode("no match for ZIP");
        assert!(matches!(geocode_err, WidgetError::Geocode { .. }));

        let weather_err = WidgetError::weather("missing daily series");
        assert!(matches!(weather_err, WidgetError::Weather { .. }));

        let validation_err = WidgetError::validation("bad zip");
        assert!(matches!(validation_err, WidgetError::Validation { .. }));
    }

    #[test]
    fn test_user_messages_collapse_transport_and_no_result() {
        // A not-found and a transport failure must read identically.
        let not_found = WidgetError::geocode("no match for ZIP 99999");
        let transport = WidgetError::geocode("request failed: connection refused");
        assert_eq!(not_found.user_message(), transport.user_message());
        assert!(not_found.user_message().contains("Could not find that ZIP"));

        let no_series = WidgetError::weather("missing daily series");
        let dead_api = WidgetError::weather("request failed: timeout");
        assert_eq!(no_series.user_message(), dead_api.user_message());
        assert!(no_series.user_message().contains("Could not fetch weather"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = WidgetError::validation("Please enter a valid US ZIP code.");
        assert_eq!(err.user_message(), "Please enter a valid US ZIP code.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let widget_err: WidgetError = io_err.into();
        assert!(matches!(widget_err, WidgetError::Io { .. }));
    }
}
