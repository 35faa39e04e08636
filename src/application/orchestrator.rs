//! Scrape orchestrator
//!
//! Drives one run: discover the page count, fan out one task per page index,
//! then reassemble the per-page results in page-index order.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::{PageCollector, PageDiscoveryService};
use crate::domain::{JobRecord, PageCount};
use crate::infrastructure::{
    HtmlSource, HttpClient,
    config::{FailurePolicy, ScraperConfig},
    csv_export,
    error::{ScrapeError, ScrapeResult},
};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub search_term: String,
    pub page_count: PageCount,
    /// Records in page-index order. Order within a page is unspecified.
    pub records: Vec<JobRecord>,
    /// Page indices skipped under [`FailurePolicy::SkipFailedPages`].
    pub failed_pages: Vec<u32>,
    pub elapsed: Duration,
}

impl ScrapeReport {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

pub struct ScrapeOrchestrator {
    config: ScraperConfig,
    discovery: PageDiscoveryService,
    collector: Arc<PageCollector>,
}

impl ScrapeOrchestrator {
    /// Build an orchestrator over any HTML source.
    pub fn new(config: ScraperConfig, source: Arc<dyn HtmlSource>) -> ScrapeResult<Self> {
        config.validate()?;
        let discovery = PageDiscoveryService::from_config(Arc::clone(&source), &config)?;
        let collector = Arc::new(PageCollector::from_config(source, &config)?);
        Ok(Self {
            config,
            discovery,
            collector,
        })
    }

    /// Build an orchestrator that fetches over HTTP.
    pub fn from_config(config: ScraperConfig) -> ScrapeResult<Self> {
        let client = HttpClient::new(config.http.clone())?;
        Self::new(config, Arc::new(client))
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run a full scrape for `term` and return the aggregate.
    pub async fn run_scrape(&self, term: &str) -> ScrapeResult<ScrapeReport> {
        let started = Instant::now();
        let base_query = self.config.site.search_url(term);
        let cancel = CancellationToken::new();
        // Dropping this future (timeout, client disconnect) stops every task it spawned.
        let _cancel_on_drop = cancel.clone().drop_guard();
        info!("🚀 Starting scrape for '{}'", term);

        let page_count = self.discovery.discover_page_count(&base_query, &cancel).await?;
        let policy = self.config.crawl.failure_policy;
        let page_permits = (self.config.crawl.max_concurrent_pages > 0)
            .then(|| Arc::new(Semaphore::new(self.config.crawl.max_concurrent_pages)));

        // Handles stay in index order; join_all preserves it.
        let handles: Vec<_> = page_count
            .indices()
            .map(|page_index| {
                let collector = Arc::clone(&self.collector);
                let base_query = base_query.clone();
                let cancel = cancel.clone();
                let permits = page_permits.clone();

                tokio::spawn(async move {
                    let _permit = match permits {
                        Some(semaphore) => Some(tokio::select! {
                            permit = semaphore.acquire_owned() => {
                                permit.map_err(|e| ScrapeError::Task(e.to_string()))?
                            },
                            () = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                        }),
                        None => None,
                    };

                    let result = collector.fetch_page(page_index, &base_query, &cancel).await;
                    if let Err(e) = &result {
                        if should_cancel_run(policy, e) {
                            error!("❌ Page {} failed, cancelling run: {}", page_index, e);
                            cancel.cancel();
                        }
                    }
                    result
                })
            })
            .collect();

        let results = join_all(handles).await;

        let mut records = Vec::new();
        let mut failed_pages = Vec::new();
        let mut first_error: Option<ScrapeError> = None;

        for (page_index, joined) in page_count.indices().zip(results) {
            match joined.map_err(ScrapeError::from).and_then(|page| page) {
                Ok(page_records) => records.extend(page_records),
                Err(e) if policy == FailurePolicy::SkipFailedPages && e.is_page_isolatable() => {
                    warn!("⚠️ Skipping page {}: {}", page_index, e);
                    failed_pages.push(page_index);
                }
                Err(e) => {
                    let replace = match &first_error {
                        None => true,
                        Some(existing) => existing.is_cancelled() && !e.is_cancelled(),
                    };
                    if replace {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let report = ScrapeReport {
            search_term: term.to_string(),
            page_count,
            records,
            failed_pages,
            elapsed: started.elapsed(),
        };
        info!(
            "🎯 Scrape complete: {} jobs from {} page(s) in {:?}",
            report.record_count(),
            report.page_count,
            report.elapsed
        );
        Ok(report)
    }

    /// Run a scrape and write the aggregate to `path` as CSV.
    pub async fn run_and_export(&self, term: &str, path: &Path) -> ScrapeResult<ScrapeReport> {
        let report = self.run_scrape(term).await?;
        csv_export::write_jobs_csv(path, &report.records, &self.config.site.detail_url_prefix())?;
        Ok(report)
    }
}

/// Whether a page failure should stop every other in-flight page.
fn should_cancel_run(policy: FailurePolicy, err: &ScrapeError) -> bool {
    if err.is_cancelled() {
        return false;
    }
    match policy {
        FailurePolicy::FailFast => true,
        FailurePolicy::SkipFailedPages => !err.is_page_isolatable(),
    }
}
