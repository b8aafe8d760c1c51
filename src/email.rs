//! Emailing a scan report to a visitor over SMTP.

use crate::models::ScanReport;
use anyhow::{Context, Result, bail};
use lettre::{
    Message, Transport, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use std::env;

const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";

fn create_mailer() -> Result<SmtpTransport> {
    let smtp_username = env::var("SMTP_USERNAME").context("Missing SMTP_USERNAME env var")?;
    let smtp_password = env::var("SMTP_PASSWORD").context("Missing SMTP_PASSWORD env var")?;
    let smtp_relay = env::var("SMTP_RELAY").unwrap_or_else(|_| DEFAULT_SMTP_RELAY.to_string());

    let credentials = Credentials::new(smtp_username, smtp_password);

    let mailer = SmtpTransport::relay(&smtp_relay)?
        .credentials(credentials)
        .build();

    Ok(mailer)
}

/// Email a completed scan report to a visitor-supplied address.
///
/// The address gets a minimal shape check before the transport sees it;
/// lettre's mailbox parser does the real validation.
pub async fn send_report(recipient: &str, report: &ScanReport) -> Result<()> {
    if !recipient.contains('@') {
        bail!("'{}' is not a valid email address", recipient);
    }

    let smtp_username = env::var("SMTP_USERNAME").context("Missing SMTP_USERNAME env var")?;

    let email = Message::builder()
        .from(
            format!("StormScan <{}>", smtp_username)
                .parse()
                .context("Failed to parse from address")?,
        )
        .to(recipient.parse().context("Failed to parse to address")?)
        .subject(format!("Your Storm Damage Report for ZIP {}", report.zip))
        .body(build_report_body(report))?;

    let mailer = create_mailer()?;

    mailer.send(&email).context("Failed to send report email")?;

    tracing::info!("Sent scan report for ZIP {} to {}", report.zip, recipient);

    Ok(())
}

/// Plain-text body for the report email
#[must_use]
pub fn build_report_body(report: &ScanReport) -> String {
    let mut body = format!(
        "Storm Damage Report for ZIP {}\n\n\
Risk Score: {}/100\n\n\
Peak conditions over the last 12 months:\n\
  Wind: {:.1} MPH\n\
  Rain: {:.2} inches\n\
  Snow: {:.1} inches\n",
        report.zip, report.risk.score, report.extremes.wind_mph, report.extremes.rain_in,
        report.extremes.snow_in,
    );

    if !report.alerts.is_empty() {
        body.push_str("\nActive weather alerts for your area:\n");
        for alert in &report.alerts {
            body.push_str("  - ");
            body.push_str(&alert.event);
            body.push('\n');
        }
    }

    body.push_str(
        "\nLocal figures are illustrative estimates based on weather severity, \
not claims records.\n\nReply to this email to schedule your free assessment.\n",
    );

    body
}
