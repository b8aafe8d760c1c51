//! HTTP routes for the widget: one page route serving the shell and a
//! small form-post API mirroring the widget methods.

use crate::config::DisplayMode;
use crate::render::RenderTarget;
use crate::widget::StormScanWidget;
use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

pub fn router(widget: Arc<StormScanWidget>) -> Router {
    Router::new()
        .route("/widget", get(widget_page))
        .route("/widget/scanning", get(scanning_page))
        .route("/healthz", get(healthz))
        .route("/api/scan", post(scan))
        .route("/api/reset", post(reset))
        .route("/api/open", post(open_modal))
        .route("/api/close", post(close_modal))
        .route("/api/email-report", post(email_report))
        .with_state(widget)
}

#[derive(Debug, Deserialize)]
struct ScanForm {
    zip: String,
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TargetForm {
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailForm {
    email: String,
    target: Option<String>,
}

/// The initial widget markup for the configured display mode
async fn widget_page(State(widget): State<Arc<StormScanWidget>>) -> Html<String> {
    let html = match widget.config().display_mode {
        DisplayMode::Floating => widget.badge(),
        DisplayMode::Inline => widget.render_current(RenderTarget::Inline).await,
    };
    Html(html)
}

/// The scanning-state markup, for hosts that show the progress animation
/// themselves while the scan request is in flight
async fn scanning_page(
    State(widget): State<Arc<StormScanWidget>>,
    Form(form): Form<TargetForm>,
) -> Html<String> {
    let target = RenderTarget::from_form_value(form.target.as_deref());
    Html(widget.scanning_markup(target))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn scan(
    State(widget): State<Arc<StormScanWidget>>,
    Form(form): Form<ScanForm>,
) -> Html<String> {
    let target = RenderTarget::from_form_value(form.target.as_deref());
    Html(widget.scan(&form.zip, target).await)
}

async fn reset(
    State(widget): State<Arc<StormScanWidget>>,
    Form(form): Form<TargetForm>,
) -> Html<String> {
    let target = RenderTarget::from_form_value(form.target.as_deref());
    Html(widget.reset(target).await)
}

async fn open_modal(State(widget): State<Arc<StormScanWidget>>) -> Html<String> {
    Html(widget.open().await)
}

async fn close_modal(State(widget): State<Arc<StormScanWidget>>) -> Html<String> {
    Html(widget.close().await)
}

async fn email_report(
    State(widget): State<Arc<StormScanWidget>>,
    Form(form): Form<EmailForm>,
) -> Html<String> {
    let target = RenderTarget::from_form_value(form.target.as_deref());
    Html(widget.email_report(&form.email, target).await)
}
