//! HTTP trigger server entry point

use anyhow::{Context, Result};
use job_scraper_lib::{
    ScraperConfig, infrastructure::init_logging_with_config, server::build_app_from_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ScraperConfig::load().context("Failed to load configuration")?;
    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("Starting job scraper server");

    let addr = config.server.bind_address.clone();
    let app = build_app_from_config(config).context("Failed to build application")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("🌐 Listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
