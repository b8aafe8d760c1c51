//! End-to-end scan pipeline tests against mocked service endpoints.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use stormscan::alerts::AlertsClient;
use stormscan::config::WidgetConfig;
use stormscan::geocode::GeocodeClient;
use stormscan::models::{AlertSeverity, RiskTier};
use stormscan::weather::ArchiveClient;
use stormscan::widget::StormScanWidget;
use stormscan::{RenderTarget, Scanner, WidgetError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct MockServices {
    geocode: MockServer,
    weather: MockServer,
    alerts: MockServer,
}

impl MockServices {
    async fn start() -> Self {
        Self {
            geocode: MockServer::start().await,
            weather: MockServer::start().await,
            alerts: MockServer::start().await,
        }
    }

    fn scanner(&self) -> Scanner {
        Scanner::with_clients(
            WidgetConfig::default(),
            GeocodeClient::with_base_url(self.geocode.uri()).unwrap(),
            ArchiveClient::with_base_url(self.weather.uri()).unwrap(),
            AlertsClient::with_base_url(self.alerts.uri()).unwrap(),
        )
    }
}

fn geocode_match() -> serde_json::Value {
    json!([{"lat": "41.8781", "lon": "-87.6298"}])
}

fn archive_body() -> serde_json::Value {
    // Peaks: wind 100 km/h -> 62.1 mph, rain 50.8 mm -> 2.0", snow 30 cm -> 11.8"
    json!({
        "daily": {
            "wind_speed_10m_max": [80.0, 100.0, null, 55.0],
            "precipitation_sum": [12.7, 50.8, 3.0, null],
            "snowfall_sum": [0.0, null, 30.0, 5.0]
        }
    })
}

fn alerts_body() -> serde_json::Value {
    json!({
        "features": [{
            "properties": {
                "event": "High Wind Warning",
                "headline": "High Wind Warning until 9 PM",
                "severity": "Severe",
                "urgency": "Expected",
                "expires": "2026-08-23T21:00:00Z",
                "description": "Gusts up to 60 mph."
            }
        }]
    })
}

async fn mount_success(services: &MockServices) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_match()))
        .mount(&services.geocode)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .mount(&services.weather)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_body()))
        .mount(&services.alerts)
        .await;
}

#[tokio::test]
async fn full_scan_produces_report() {
    let services = MockServices::start().await;
    mount_success(&services).await;

    let report = services.scanner().run(" 60601 ").await.unwrap();

    assert_eq!(report.zip, "60601");
    assert_eq!(report.extremes.wind_mph, 62.1);
    assert_eq!(report.extremes.rain_in, 2.0);
    assert_eq!(report.extremes.snow_in, 11.8);

    // 62.1/60*40 + 2.0/1.5*35 + 11.8/12*25 overshoots and clamps at 100
    assert_eq!(report.risk.score, 100);
    assert_eq!(report.risk.tier, RiskTier::High);

    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].event, "High Wind Warning");
    assert_eq!(report.alerts[0].severity, AlertSeverity::Severe);

    assert_eq!(report.stats.timeframe, "90 days");
    assert!(report.stats.properties_affected > 0);
}

#[tokio::test]
async fn geocode_miss_skips_weather_and_alerts() {
    let services = MockServices::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&services.geocode)
        .await;
    // Neither downstream service may be called after a geocode miss
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .expect(0)
        .mount(&services.weather)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_body()))
        .expect(0)
        .mount(&services.alerts)
        .await;

    let err = services.scanner().run("99999").await.unwrap_err();
    assert!(matches!(err, WidgetError::Geocode { .. }));
    assert_eq!(
        err.user_message(),
        "Could not find that ZIP code. Please try again."
    );
}

#[tokio::test]
async fn weather_failure_is_fatal_even_when_alerts_succeed() {
    let services = MockServices::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_match()))
        .mount(&services.geocode)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&services.weather)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_body()))
        .mount(&services.alerts)
        .await;

    let err = services.scanner().run("60601").await.unwrap_err();
    assert!(matches!(err, WidgetError::Weather { .. }));
    assert_eq!(
        err.user_message(),
        "Could not fetch weather data. Please try again."
    );
}

#[tokio::test]
async fn alerts_failure_degrades_to_empty_list() {
    let services = MockServices::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_match()))
        .mount(&services.geocode)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .mount(&services.weather)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&services.alerts)
        .await;

    let report = services.scanner().run("60601").await.unwrap();
    assert!(report.alerts.is_empty());
    assert_eq!(report.risk.score, 100);
}

#[tokio::test]
async fn widget_scan_renders_results_fragment() {
    let services = MockServices::start().await;
    mount_success(&services).await;

    let widget = StormScanWidget::with_scanner(WidgetConfig::default(), services.scanner())
        .with_result_delay(Duration::ZERO);

    let html = widget.scan("60601", RenderTarget::Modal).await;
    assert!(html.contains(r#"data-state="results""#));
    assert!(html.contains("ZIP 60601"));
    assert!(html.contains("100/100"));
    assert!(html.contains("HIGH WIND WARNING"));
}

#[tokio::test]
async fn superseding_scan_discards_the_stale_result() {
    let services = MockServices::start().await;
    mount_success(&services).await;

    // The first scan's result is held long enough for the second to start
    let widget = Arc::new(
        StormScanWidget::with_scanner(WidgetConfig::default(), services.scanner())
            .with_result_delay(Duration::from_millis(300)),
    );

    let first = {
        let widget = Arc::clone(&widget);
        async move { widget.scan("11111", RenderTarget::Modal).await }
    };
    let second = {
        let widget = Arc::clone(&widget);
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            widget.scan("60601", RenderTarget::Modal).await
        }
    };

    let (first_html, second_html) = tokio::join!(first, second);

    // The stale scan never renders its own results
    assert!(!first_html.contains("ZIP 11111"));
    assert!(second_html.contains("ZIP 60601"));

    // The committed state belongs to the superseding scan
    let current = widget.render_current(RenderTarget::Modal).await;
    assert!(current.contains("ZIP 60601"));
}
