//! HTML fragment rendering for the widget states.
//!
//! One set of fragment builders serves both presentation targets (modal
//! overlay and inline card); the state machine is shared and only the
//! view template varies. Every interpolated user or config string is
//! HTML-escaped before it reaches a fragment.

use crate::alerts::format_expiry;
use crate::config::{Industry, WidgetConfig};
use crate::models::{Alert, HistoricalStats, RiskTier, ScanReport};
use crate::scanner::{PROGRESS_CADENCE, PROGRESS_STEP_PERCENT, PROGRESS_MESSAGES};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Which container a fragment is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// Modal overlay opened from the floating badge
    Modal,
    /// Card rendered in the page flow
    Inline,
}

impl RenderTarget {
    /// Value carried in the `target` form field
    #[must_use]
    pub fn form_value(&self) -> &'static str {
        match self {
            RenderTarget::Modal => "modal",
            RenderTarget::Inline => "inline",
        }
    }

    /// CSS class prefix for the container
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            RenderTarget::Modal => "stormscan-modal",
            RenderTarget::Inline => "stormscan-inline",
        }
    }

    /// Parse a `target` form value; anything unrecognized means modal.
    #[must_use]
    pub fn from_form_value(value: Option<&str>) -> Self {
        match value {
            Some("inline") => RenderTarget::Inline,
            _ => RenderTarget::Modal,
        }
    }
}

/// Escape a string for interpolation into HTML text or attribute values
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Darken or lighten a #RRGGBB color by a percentage, clamping channels.
#[must_use]
pub fn adjust_color(hex: &str, percent: i32) -> String {
    let Some(value) = hex
        .strip_prefix('#')
        .and_then(|h| u32::from_str_radix(h, 16).ok())
    else {
        return hex.to_string();
    };

    let amount = (2.55 * f64::from(percent)).round() as i32;
    let adjust = |channel: u32| -> u32 {
        (channel as i32 + amount).clamp(0, 255) as u32
    };

    let r = adjust((value >> 16) & 0xff);
    let g = adjust((value >> 8) & 0xff);
    let b = adjust(value & 0xff);

    format!("#{r:02x}{g:02x}{b:02x}")
}

/// The floating badge shown in floating display mode
#[must_use]
pub fn badge_fragment(config: &WidgetConfig) -> String {
    let position = match config.badge_position {
        crate::config::BadgePosition::Left => "left",
        crate::config::BadgePosition::Right => "right",
    };
    format!(
        concat!(
            r#"<div class="stormscan-badge {position}">"#,
            r#"<div class="stormscan-bubble">{hook}</div>"#,
            r#"<form method="post" action="/api/open">"#,
            r#"<button type="submit" class="stormscan-circle" style="background: {theme}">Scan</button>"#,
            r#"</form></div>"#
        ),
        position = position,
        hook = escape_html(&config.hook_text),
        theme = escape_html(&config.theme_color),
    )
}

/// The input state: headline, ZIP field, scan button, optional error banner
#[must_use]
pub fn input_fragment(target: RenderTarget, config: &WidgetConfig, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<div class="{}-content" data-state="input">"#, target.class());

    if let Some(message) = error {
        let _ = write!(
            out,
            r#"<div class="stormscan-error" role="alert">{}</div>"#,
            escape_html(message)
        );
    }

    let _ = write!(
        out,
        concat!(
            r#"<h2 class="stormscan-headline" style="color: {headline_color}">{headline}</h2>"#,
            r#"<p class="stormscan-subheadline">{subheadline}</p>"#,
            r#"<form method="post" action="/api/scan">"#,
            r#"<input type="hidden" name="target" value="{target}">"#,
            r#"<input type="text" name="zip" class="stormscan-input" placeholder="Enter ZIP Code">"#,
            r#"<button type="submit" class="stormscan-btn" style="background: {theme}">SCAN MY PROPERTY</button>"#,
            r#"</form>"#,
            r#"<div class="stormscan-fineprint">Free &bull; 30 seconds &bull; No credit card</div>"#,
            r#"</div>"#
        ),
        headline_color = escape_html(&config.headline_color),
        headline = escape_html(&config.headline),
        subheadline = escape_html(&config.subheadline),
        target = target.form_value(),
        theme = escape_html(&config.theme_color),
    );

    out
}

/// The scanning state: deterministic progress animation parameters.
///
/// Purely cosmetic; the schedule always runs to 100% regardless of when
/// the network calls actually finish.
#[must_use]
pub fn scanning_fragment(target: RenderTarget, config: &WidgetConfig) -> String {
    let messages =
        serde_json::to_string(&PROGRESS_MESSAGES).unwrap_or_else(|_| "[]".to_string());

    format!(
        concat!(
            r#"<div class="{class}-content" data-state="scanning" "#,
            r#"data-cadence-ms="{cadence}" data-step-percent="{step}">"#,
            r#"<div class="stormscan-scanning-title">ANALYZING...</div>"#,
            r#"<div class="stormscan-status" data-messages="{messages}">{first_message}</div>"#,
            r#"<div class="stormscan-progress-track">"#,
            r#"<div class="stormscan-progress" style="width: 0%; background: {theme}"></div>"#,
            r#"</div>"#,
            r#"</div>"#
        ),
        class = target.class(),
        cadence = PROGRESS_CADENCE.as_millis(),
        step = PROGRESS_STEP_PERCENT,
        messages = escape_html(&messages),
        first_message = PROGRESS_MESSAGES[0],
        theme = escape_html(&config.theme_color),
    )
}

/// An error card for the inline target; the modal target reuses the input
/// fragment with an error banner instead.
#[must_use]
pub fn error_fragment(target: RenderTarget, config: &WidgetConfig, message: &str) -> String {
    match target {
        RenderTarget::Modal => input_fragment(target, config, Some(message)),
        RenderTarget::Inline => format!(
            concat!(
                r#"<div class="stormscan-inline-content" data-state="error">"#,
                r#"<h2 class="stormscan-headline">Error</h2>"#,
                r#"<p class="stormscan-subheadline">{message}</p>"#,
                r#"<form method="post" action="/api/reset">"#,
                r#"<input type="hidden" name="target" value="inline">"#,
                r#"<button type="submit" class="stormscan-btn" style="background: {theme}">TRY AGAIN</button>"#,
                r#"</form>"#,
                r#"</div>"#
            ),
            message = escape_html(message),
            theme = escape_html(&config.theme_color),
        ),
    }
}

/// The full results fragment: alerts, risk header, loss-aversion block,
/// damage-report estimates, metric rows, urgency, social proof, lead CTA,
/// email button, trust signals, and the reset control.
#[must_use]
pub fn results_fragment(
    target: RenderTarget,
    config: &WidgetConfig,
    report: &ScanReport,
    now: DateTime<Utc>,
) -> String {
    let style = report.risk.tier.style();
    let zip = escape_html(&report.zip);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="{}-content" data-state="results">"#,
        target.class()
    );

    out.push_str(&alerts_block(target, &report.alerts, now));

    // Risk header with score
    let _ = write!(
        out,
        concat!(
            r#"<div class="stormscan-risk-header" style="background: {bg}; border-color: {border}">"#,
            r#"<div class="stormscan-risk-label" style="color: {text}">{icon} {label}</div>"#,
            r#"<div class="stormscan-risk-meta" style="color: {text}">ZIP {zip} &bull; Risk Score: {score}/100</div>"#,
            r#"</div>"#
        ),
        bg = style.bg_color,
        border = style.border_color,
        text = style.text_color,
        icon = style.icon,
        label = style.label,
        zip = zip,
        score = report.risk.score,
    );

    if report.risk.tier.is_elevated() {
        let _ = write!(
            out,
            concat!(
                r#"<div class="stormscan-loss-aversion">"#,
                r#"<div class="stormscan-block-title">WITHOUT ACTION - EXPECT:</div>"#,
                r#"<div class="stormscan-block-body">{}</div>"#,
                r#"</div>"#
            ),
            damage_estimate(config.industry, report.risk.tier),
        );
    }

    out.push_str(&stats_block(&report.stats));

    // Weather metric rows with over-threshold flags
    out.push_str(r#"<div class="stormscan-analysis">"#);
    out.push_str(r#"<div class="stormscan-block-title">YOUR PROPERTY ANALYSIS</div>"#);
    out.push_str(&metric_row(
        "Peak Wind",
        &format!("{:.1}", report.extremes.wind_mph),
        " MPH",
        config.thresholds.wind,
        report.extremes.wind_mph > config.thresholds.wind,
    ));
    out.push_str(&metric_row(
        "Peak Rain",
        &format!("{:.2}", report.extremes.rain_in),
        "\"",
        config.thresholds.rain,
        report.extremes.rain_in > config.thresholds.rain,
    ));
    out.push_str(&metric_row(
        "Peak Snow",
        &format!("{:.1}", report.extremes.snow_in),
        "\"",
        config.thresholds.snow,
        report.extremes.snow_in > config.thresholds.snow,
    ));
    let _ = write!(
        out,
        concat!(
            r#"<div class="stormscan-combined-risk">"#,
            r#"<span>Combined Risk</span>"#,
            r#"<strong style="color: {}">{}/100</strong>"#,
            r#"</div></div>"#
        ),
        style.score_color, report.risk.score,
    );

    if report.risk.tier.is_elevated() {
        out.push_str(concat!(
            r#"<div class="stormscan-urgency">"#,
            r#"<div class="stormscan-block-title">CRITICAL TIMELINE</div>"#,
            r#"<div class="stormscan-block-body">"#,
            r#"<div><strong>Next 48 hours:</strong> Highest risk window for damage</div>"#,
            r#"<div><strong>This week:</strong> Conditions worsen with each storm</div>"#,
            r#"<div><strong>Next 30 days:</strong> Peak vulnerability period</div>"#,
            r#"</div></div>"#
        ));
    }

    // Social proof
    let _ = write!(
        out,
        concat!(
            r#"<div class="stormscan-social-proof">"#,
            r#"<div class="stormscan-block-title">THIS MONTH IN YOUR AREA:</div>"#,
            r#"<div class="stormscan-block-body">"#,
            r#"<div>&bull; 847 homeowners protected their properties</div>"#,
            r#"<div>&bull; 73 residents in {zip} requested assessments</div>"#,
            r#"<div>&bull; Avg. damage prevented: <strong>$12,400</strong> per property</div>"#,
            r#"</div></div>"#
        ),
        zip = zip,
    );

    out.push_str(&cta_block(config, report));
    out.push_str(&email_button(target, report));

    out.push_str(concat!(
        r#"<div class="stormscan-trust">"#,
        r#"Your info is secure &bull; 2-hour response time<br>"#,
        r#"No obligation &bull; Call back guarantee"#,
        r#"</div>"#
    ));

    let _ = write!(
        out,
        concat!(
            r#"<form method="post" action="/api/reset">"#,
            r#"<input type="hidden" name="target" value="{}">"#,
            r#"<button type="submit" class="stormscan-reset">CHECK ANOTHER ADDRESS</button>"#,
            r#"</form></div>"#
        ),
        target.form_value(),
    );

    out
}

/// Active-alerts banner; empty string when there are no alerts.
fn alerts_block(target: RenderTarget, alerts: &[Alert], now: DateTime<Utc>) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(r#"<div class="stormscan-alerts">"#);
    out.push_str(r#"<div class="stormscan-block-title">ACTIVE WEATHER ALERTS</div>"#);

    for alert in alerts {
        // The inline card sits on a dark gradient and uses one fixed light
        // palette; the modal colors each alert by severity.
        let (bg, border, text) = match target {
            RenderTarget::Modal => {
                let palette = alert.severity.palette();
                (palette.bg, palette.border, palette.text)
            }
            RenderTarget::Inline => ("rgba(220, 38, 38, 0.3)", "#fca5a5", "#fecaca"),
        };
        let _ = write!(
            out,
            concat!(
                r#"<div class="stormscan-alert" style="background: {bg}; border-left-color: {border}">"#,
                r#"<div class="stormscan-alert-event" style="color: {text}">{event}</div>"#,
                r#"<div class="stormscan-alert-expiry" style="color: {text}">{expiry}</div>"#,
                r#"</div>"#
            ),
            bg = bg,
            border = border,
            text = text,
            event = escape_html(&alert.event.to_uppercase()),
            expiry = escape_html(&format_expiry(alert.expires, now)),
        );
    }

    out.push_str("</div>");
    out
}

/// The synthetic local damage report, labeled as an estimate.
fn stats_block(stats: &HistoricalStats) -> String {
    format!(
        concat!(
            r#"<div class="stormscan-stats">"#,
            r#"<div class="stormscan-block-title">LOCAL DAMAGE REPORT ({timeframe}):</div>"#,
            r#"<div class="stormscan-block-body">"#,
            r#"<div>&bull; <strong>{properties}</strong> properties within {radius} reported weather damage</div>"#,
            r#"<div>&bull; <strong>{claims}</strong> insurance claims filed in your area</div>"#,
            r#"<div>&bull; Avg. repair cost: <strong>${cost}</strong></div>"#,
            r#"</div>"#,
            r#"<div class="stormscan-stats-disclaimer">Illustrative estimates based on weather severity, not claims records.</div>"#,
            r#"</div>"#
        ),
        timeframe = escape_html(&stats.timeframe),
        properties = stats.properties_affected,
        radius = escape_html(&stats.radius),
        claims = stats.insurance_claims,
        cost = format_thousands(stats.avg_repair_cost),
    )
}

/// One weather metric row with its threshold and over-limit flag
fn metric_row(label: &str, value: &str, unit: &str, threshold: f64, over: bool) -> String {
    let over_flag = if over {
        r#"<div class="stormscan-over-limit">OVER LIMIT</div>"#
    } else {
        ""
    };
    format!(
        concat!(
            r#"<div class="stormscan-metric">"#,
            r#"<div class="stormscan-metric-label">{label}"#,
            r#"<div class="stormscan-metric-threshold">Threshold: {threshold}{unit}</div></div>"#,
            r#"<div class="stormscan-metric-value"><strong>{value}{unit}</strong>{over_flag}</div>"#,
            r#"</div>"#
        ),
        label = escape_html(label),
        threshold = threshold,
        unit = escape_html(unit),
        value = escape_html(value),
        over_flag = over_flag,
    )
}

/// Lead-capture call to action: the enriched form embed when one is
/// configured, otherwise the click-to-contact fallback.
fn cta_block(config: &WidgetConfig, report: &ScanReport) -> String {
    if let Some(embed) = config
        .ghl_form_embed
        .as_deref()
        .and_then(|embed| enrich_form_embed(embed, report))
    {
        return format!(r#"<div class="stormscan-form-embed">{embed}</div>"#);
    }

    let theme = &config.theme_color;
    format!(
        concat!(
            r#"<div class="stormscan-cta" style="background: linear-gradient(135deg, {theme} 0%, {darker} 100%)">"#,
            r#"<div class="stormscan-cta-title">GET FREE EMERGENCY ASSESSMENT</div>"#,
            r#"<div class="stormscan-cta-sub">Next Available: Tomorrow &bull; Value: $225 &rarr; Today: FREE</div>"#,
            r#"</div>"#
        ),
        theme = escape_html(theme),
        darker = adjust_color(theme, -20),
    )
}

/// Secondary CTA: email-me-this-report form carrying the scan figures
fn email_button(target: RenderTarget, report: &ScanReport) -> String {
    format!(
        concat!(
            r#"<form method="post" action="/api/email-report" class="stormscan-email-form">"#,
            r#"<input type="hidden" name="target" value="{target}">"#,
            r#"<input type="hidden" name="zip" value="{zip}">"#,
            r#"<input type="hidden" name="wind" value="{wind:.1}">"#,
            r#"<input type="hidden" name="rain" value="{rain:.2}">"#,
            r#"<input type="hidden" name="snow" value="{snow:.1}">"#,
            r#"<input type="hidden" name="risk_score" value="{score}">"#,
            r#"<input type="email" name="email" placeholder="you@example.com" required>"#,
            r#"<button type="submit" class="stormscan-email-btn">EMAIL ME THIS REPORT (No Obligation)</button>"#,
            r#"</form>"#
        ),
        target = target.form_value(),
        zip = escape_html(&report.zip),
        wind = report.extremes.wind_mph,
        rain = report.extremes.rain_in,
        snow = report.extremes.snow_in,
        score = report.risk.score,
    )
}

/// Enrich a configured iframe embed with the scan figures as query
/// parameters. Returns None when the embed holds no iframe src to enrich.
pub fn enrich_form_embed(embed: &str, report: &ScanReport) -> Option<String> {
    let iframe_start = embed.find("<iframe")?;
    let src_offset = embed[iframe_start..].find("src=\"")?;
    let src_start = iframe_start + src_offset + "src=\"".len();
    let src_len = embed[src_start..].find('"')?;
    let src = &embed[src_start..src_start + src_len];

    let separator = if src.contains('?') { '&' } else { '?' };
    let params = format!(
        "{separator}wind_speed={:.1}&rain={:.2}&snow={:.1}&zip={}&risk_score={}",
        report.extremes.wind_mph,
        report.extremes.rain_in,
        report.extremes.snow_in,
        urlencoding::encode(&report.zip),
        report.risk.score,
    );

    let mut enriched = String::with_capacity(embed.len() + params.len());
    enriched.push_str(&embed[..src_start + src_len]);
    enriched.push_str(&params);
    enriched.push_str(&embed[src_start + src_len..]);
    Some(enriched)
}

/// Industry-specific loss-aversion copy for elevated risk tiers.
///
/// Low risk never shows this block, so it maps to the medium copy.
#[must_use]
pub fn damage_estimate(industry: Industry, tier: RiskTier) -> &'static str {
    let high = matches!(tier, RiskTier::High);
    match industry {
        Industry::Roofer => {
            if high {
                "$8,000-$15,000 in preventable roof damage<br>10-20% property value decrease<br>Shingle/flashing failure within 90 days<br>$3,000-$7,000 emergency repair costs"
            } else {
                "$3,000-$8,000 in preventable roof damage<br>5-10% property value decrease<br>30-40% shingle deterioration risk<br>$1,500-$4,000 emergency repair costs"
            }
        }
        Industry::TreeService => {
            if high {
                "$8,000-$15,000 in preventable tree damage<br>10-20% property value decrease<br>30-40% branch loss within 90 days<br>$3,000-$7,000 emergency removal costs"
            } else {
                "$3,000-$8,000 in preventable tree damage<br>5-10% property value decrease<br>20-30% branch loss risk<br>$1,500-$4,000 emergency removal costs"
            }
        }
        Industry::Landscaper => {
            if high {
                "$5,000-$12,000 in landscape damage<br>10-15% property value decrease<br>50-60% plant/shrub loss within 90 days<br>$2,000-$5,000 emergency restoration costs"
            } else {
                "$2,000-$6,000 in landscape damage<br>5-10% property value decrease<br>30-40% plant/shrub loss risk<br>$1,000-$3,000 emergency restoration costs"
            }
        }
        Industry::Contractor => {
            if high {
                "$8,000-$15,000 in preventable structural damage<br>10-20% property value decrease<br>Foundation/siding issues within 90 days<br>$3,000-$7,000 emergency repair costs"
            } else {
                "$3,000-$8,000 in preventable structural damage<br>5-10% property value decrease<br>Siding/trim deterioration risk<br>$1,500-$4,000 emergency repair costs"
            }
        }
        Industry::Restoration => {
            if high {
                "$10,000-$20,000 in water/storm damage<br>15-25% property value decrease<br>Mold/structural issues within 60 days<br>$5,000-$10,000 emergency mitigation costs"
            } else {
                "$4,000-$10,000 in water/storm damage<br>8-15% property value decrease<br>Water intrusion risk<br>$2,000-$5,000 emergency mitigation costs"
            }
        }
    }
}

/// Group a dollar amount with thousands separators
fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
