//! HTTP server wiring: CORS-open so the widget can be embedded anywhere.

use crate::config::StormScanConfig;
use crate::routing;
use crate::widget::StormScanWidget;
use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub async fn run(config: StormScanConfig) -> Result<()> {
    let widget = Arc::new(StormScanWidget::new(config.widget.clone())?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routing::router(widget).layer(cors);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("StormScan widget server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
