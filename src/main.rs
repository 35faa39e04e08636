//! Standalone scrape run
//!
//! Scrapes the configured default search term and writes the results to the
//! configured CSV path.

use anyhow::{Context, Result};
use job_scraper_lib::{ScrapeOrchestrator, ScraperConfig, infrastructure::init_logging_with_config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ScraperConfig::load().context("Failed to load configuration")?;
    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;

    println!("start");

    let term = config.site.default_term.clone();
    let csv_path = config.output.csv_path.clone();
    let orchestrator = ScrapeOrchestrator::from_config(config)?;

    let report = orchestrator
        .run_and_export(&term, &csv_path)
        .await
        .with_context(|| format!("Scrape for '{term}' failed"))?;

    if !report.failed_pages.is_empty() {
        tracing::warn!("⚠️ Skipped pages: {:?}", report.failed_pages);
    }

    println!("Done, extracted {}", report.record_count());
    Ok(())
}
