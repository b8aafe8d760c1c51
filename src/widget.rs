//! The widget facade: one instance per embedding, owning the session
//! state machine and handing back rendered HTML fragments.

use crate::WidgetError;
use crate::config::WidgetConfig;
use crate::render::{self, RenderTarget};
use crate::scanner::{RESULT_DISPLAY_DELAY, Scanner, ScanSession, ScanState};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A configured widget instance.
///
/// Holds exactly one scan session; a new scan replaces the previous one.
/// Concurrent scans are serialized by a monotonic sequence token: only the
/// most recently started scan may commit its result.
#[derive(Debug)]
pub struct StormScanWidget {
    config: WidgetConfig,
    scanner: Scanner,
    session: Mutex<ScanSession>,
    scan_seq: AtomicU64,
    result_delay: Duration,
}

impl StormScanWidget {
    /// Create a widget against the public service endpoints
    pub fn new(config: WidgetConfig) -> Result<Self, WidgetError> {
        let scanner = Scanner::new(config.clone())?;
        Ok(Self::with_scanner(config, scanner))
    }

    /// Create a widget around an existing scanner (used by tests)
    pub fn with_scanner(config: WidgetConfig, scanner: Scanner) -> Self {
        Self {
            config,
            scanner,
            session: Mutex::new(ScanSession::default()),
            scan_seq: AtomicU64::new(0),
            result_delay: RESULT_DISPLAY_DELAY,
        }
    }

    /// Replace the flat delay between scan completion and result display.
    ///
    /// Tests zero this out; production keeps the stock pacing.
    #[must_use]
    pub fn with_result_delay(mut self, delay: Duration) -> Self {
        self.result_delay = delay;
        self
    }

    /// Widget configuration this instance was built with
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Open the modal overlay and render its current state
    pub async fn open(&self) -> String {
        let mut session = self.session.lock().await;
        session.modal_open = true;
        self.render_state(RenderTarget::Modal, &session)
    }

    /// Close the modal overlay. Session state survives so reopening shows
    /// the same results or error.
    pub async fn close(&self) -> String {
        let mut session = self.session.lock().await;
        session.modal_open = false;
        render::badge_fragment(&self.config)
    }

    /// Return to the input state without clearing the modal-open flag
    pub async fn reset(&self, target: RenderTarget) -> String {
        let mut session = self.session.lock().await;
        session.reset(None);
        session.zip = None;
        self.render_state(target, &session)
    }

    /// Run a scan for a raw ZIP input and render the resulting state.
    ///
    /// Validation failures render the input state with an error banner and
    /// leave the session untouched. A scan started while this one is in
    /// flight supersedes it: the stale result is discarded unrendered.
    pub async fn scan(&self, raw_zip: &str, target: RenderTarget) -> String {
        if let Err(e) = crate::geocode::validate_zip(raw_zip) {
            return render::error_fragment(target, &self.config, &e.user_message());
        }

        let token = self.scan_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut session = self.session.lock().await;
            session.state = ScanState::Scanning;
            session.last_error = None;
            session.zip = Some(raw_zip.trim().to_string());
        }

        let outcome = self.scanner.run(raw_zip).await;
        tokio::time::sleep(self.result_delay).await;

        let mut session = self.session.lock().await;
        if self.scan_seq.load(Ordering::SeqCst) != token {
            info!("Discarding superseded scan result for '{}'", raw_zip.trim());
            return self.render_state(target, &session);
        }

        match outcome {
            Ok(report) => {
                session.state = ScanState::Results(Box::new(report));
            }
            Err(e) => {
                warn!("Scan failed: {}", e);
                session.reset(Some(e.user_message()));
            }
        }

        self.render_state(target, &session)
    }

    /// Email the report currently on display to a visitor address.
    ///
    /// A no-op outside the results state. Send failures keep the results
    /// on screen but surface an error banner.
    pub async fn email_report(&self, recipient: &str, target: RenderTarget) -> String {
        let report = {
            let session = self.session.lock().await;
            match &session.state {
                ScanState::Results(report) => report.as_ref().clone(),
                _ => return self.render_state(target, &session),
            }
        };

        if let Err(e) = crate::email::send_report(recipient, &report).await {
            warn!("Report email failed: {}", e);
            let err = WidgetError::email(e.to_string());
            return render::error_fragment(target, &self.config, &err.user_message());
        }

        self.render_current(target).await
    }

    /// Render the session's current state for a target
    pub async fn render_current(&self, target: RenderTarget) -> String {
        let session = self.session.lock().await;
        self.render_state(target, &session)
    }

    /// The floating badge markup for the host page
    #[must_use]
    pub fn badge(&self) -> String {
        render::badge_fragment(&self.config)
    }

    /// The scanning-state markup, exposed for clients that render the
    /// progress animation while a scan request is in flight.
    #[must_use]
    pub fn scanning_markup(&self, target: RenderTarget) -> String {
        render::scanning_fragment(target, &self.config)
    }

    fn render_state(&self, target: RenderTarget, session: &ScanSession) -> String {
        match &session.state {
            ScanState::Input => match &session.last_error {
                Some(message) => render::error_fragment(target, &self.config, message),
                None => render::input_fragment(target, &self.config, None),
            },
            ScanState::Scanning => render::scanning_fragment(target, &self.config),
            ScanState::Results(report) => {
                render::results_fragment(target, &self.config, report, Utc::now())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> StormScanWidget {
        let config = WidgetConfig::default();
        let scanner = Scanner::new(config.clone()).unwrap();
        StormScanWidget::with_scanner(config, scanner).with_result_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_open_renders_input_state() {
        let widget = widget();
        let html = widget.open().await;
        assert!(html.contains("Check Your Property Status"));
        assert!(html.contains("SCAN MY PROPERTY"));
    }

    #[tokio::test]
    async fn test_invalid_zip_renders_error_without_state_change() {
        let widget = widget();
        widget.open().await;

        let html = widget.scan("abc", RenderTarget::Modal).await;
        assert!(html.contains("Please enter a valid US ZIP code."));

        // The session never left the input state
        let session = widget.session.lock().await;
        assert_eq!(session.state, ScanState::Input);
        assert!(session.last_error.is_none());
        assert!(session.modal_open);
    }

    #[tokio::test]
    async fn test_close_keeps_session_state() {
        let widget = widget();
        widget.open().await;
        widget.close().await;

        let session = widget.session.lock().await;
        assert!(!session.modal_open);
        assert_eq!(session.state, ScanState::Input);
    }

    #[tokio::test]
    async fn test_reset_clears_error_and_zip() {
        let widget = widget();
        {
            let mut session = widget.session.lock().await;
            session.reset(Some("Could not fetch weather data. Please try again.".into()));
            session.zip = Some("60601".into());
        }

        let html = widget.reset(RenderTarget::Inline).await;
        assert!(html.contains("Check Your Property Status"));

        let session = widget.session.lock().await;
        assert!(session.last_error.is_none());
        assert!(session.zip.is_none());
    }
}
