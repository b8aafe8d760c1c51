use anyhow::Result;
use stormscan::config::StormScanConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &StormScanConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = StormScanConfig::load()?;
    init_tracing(&config);

    tracing::info!("Starting StormScan widget server v{}", stormscan::VERSION);

    stormscan::web::run(config).await
}
