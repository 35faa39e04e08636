//! Page collector
//!
//! Fetches one result page and extracts its job cards concurrently. Cards
//! are cut out of the page as owned HTML strings so each extraction can run
//! in its own task; records come back over a channel in completion order.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::JobRecord;
use crate::infrastructure::{
    HtmlSource, JobCardParser,
    config::{ScraperConfig, utils},
    error::{ScrapeError, ScrapeResult},
};

pub struct PageCollector {
    source: Arc<dyn HtmlSource>,
    parser: Arc<JobCardParser>,
    page_size: u32,
    /// `None` when card concurrency is unbounded.
    card_permits: Option<Arc<Semaphore>>,
}

impl PageCollector {
    pub fn new(
        source: Arc<dyn HtmlSource>,
        parser: Arc<JobCardParser>,
        page_size: u32,
        max_concurrent_cards: usize,
    ) -> Self {
        let card_permits =
            (max_concurrent_cards > 0).then(|| Arc::new(Semaphore::new(max_concurrent_cards)));
        Self {
            source,
            parser,
            page_size,
            card_permits,
        }
    }

    pub fn from_config(source: Arc<dyn HtmlSource>, config: &ScraperConfig) -> ScrapeResult<Self> {
        Ok(Self::new(
            source,
            Arc::new(JobCardParser::new(&config.selectors)?),
            config.site.page_size,
            config.crawl.max_concurrent_cards,
        ))
    }

    /// Fetch page `page_index` of `base_query` and return its records.
    ///
    /// Record order within the page is completion order, not document order.
    /// A page without cards yields an empty vector.
    pub async fn fetch_page(
        &self,
        page_index: u32,
        base_query: &str,
        cancel: &CancellationToken,
    ) -> ScrapeResult<Vec<JobRecord>> {
        let url = utils::page_url(base_query, page_index, self.page_size);
        let html = self.source.fetch_html(&url, cancel).await?;

        let fragments = self.parser.card_fragments(&html);
        let expected = fragments.len();
        if expected == 0 {
            debug!("Page {} has no job cards", page_index);
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::channel(expected);
        for fragment in fragments {
            let tx = tx.clone();
            let parser = Arc::clone(&self.parser);
            let permits = self.card_permits.clone();
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let _permit = match permits {
                    Some(semaphore) => tokio::select! {
                        permit = semaphore.acquire_owned() => permit.ok(),
                        () = cancel.cancelled() => return,
                    },
                    None => None,
                };
                if cancel.is_cancelled() {
                    return;
                }
                let record = parser.extract_record(&fragment);
                // Capacity equals the card count, so this never waits.
                let _ = tx.send(record).await;
            });
        }
        drop(tx);

        let mut records = Vec::with_capacity(expected);
        for _ in 0..expected {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(record) => records.push(record),
                    None => {
                        return Err(ScrapeError::Task(format!(
                            "card extraction on page {page_index} ended early ({} of {expected} records)",
                            records.len()
                        )));
                    }
                },
                () = cancel.cancelled() => return Err(ScrapeError::Cancelled),
            }
        }

        info!("✅ Page {}: extracted {} jobs", page_index, records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SelectorConfig;
    use crate::test_utils::{FakeHtmlSource, card, pagination, result_page};
    use std::time::Duration;

    const BASE: &str = "http://jobs.test/jobs?q=go&limit=50";

    fn collector(source: FakeHtmlSource, max_cards: usize) -> PageCollector {
        let parser = Arc::new(JobCardParser::new(&SelectorConfig::default()).unwrap());
        PageCollector::new(Arc::new(source), parser, 50, max_cards)
    }

    fn sorted_by_id(mut records: Vec<JobRecord>) -> Vec<JobRecord> {
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    #[tokio::test]
    async fn extracts_every_card_on_the_page() {
        let html = result_page(
            &[
                card(Some("j1"), "Backend  Engineer", "Acme", "Austin, TX"),
                card(Some("j2"), "SRE", "Globex", "Remote"),
                card(None, "Intern", "Initech", "Boston"),
            ],
            Some(&pagination(&["2", "3", "Next"])),
        );
        let source = FakeHtmlSource::new().with_page(format!("{BASE}&start=50"), html);

        let records = collector(source, 0)
            .fetch_page(1, BASE, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            sorted_by_id(records),
            vec![
                JobRecord::new("", "Intern", "Initech", "Boston"),
                JobRecord::new("j1", "Backend Engineer", "Acme", "Austin, TX"),
                JobRecord::new("j2", "SRE", "Globex", "Remote"),
            ]
        );
    }

    #[tokio::test]
    async fn bounded_card_concurrency_still_collects_all() {
        let cards: Vec<String> = (0..20)
            .map(|i| card(Some(&format!("id{i:02}")), "Dev", "Co", "Here"))
            .collect();
        let source =
            FakeHtmlSource::new().with_page(format!("{BASE}&start=0"), result_page(&cards, None));

        let records = collector(source, 2)
            .fetch_page(0, BASE, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(records.len(), 20);
    }

    #[tokio::test]
    async fn zero_card_page_is_empty_not_error() {
        let source = FakeHtmlSource::new()
            .with_page(format!("{BASE}&start=0"), "<html><body>No results</body></html>");
        let records = collector(source, 0)
            .fetch_page(0, BASE, &CancellationToken::new())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let source = FakeHtmlSource::new().with_status(format!("{BASE}&start=100"), 500);
        let err = collector(source, 0)
            .fetch_page(2, BASE, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { status: 500, .. }));
    }

    #[tokio::test]
    async fn cancellation_interrupts_fetch() {
        let url = format!("{BASE}&start=0");
        let source = FakeHtmlSource::new()
            .with_page(url.clone(), result_page(&[], None))
            .with_delay(url, Duration::from_secs(30));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = collector(source, 0).fetch_page(0, BASE, &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
