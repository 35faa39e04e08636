//! Page Discovery Service
//!
//! Determines how many result pages a search has. The site only shows a
//! local neighborhood of page links, so discovery walks forward: read the
//! pagination block, jump to the page named by its second-to-last link, and
//! repeat until a block with exactly three links is found.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::pagination::{self, PageCount, PaginationStep};
use crate::infrastructure::{
    HtmlSource, PaginationParser,
    config::{ScraperConfig, utils},
    error::ScrapeResult,
};

/// Service for discovering pagination information
pub struct PageDiscoveryService {
    source: Arc<dyn HtmlSource>,
    parser: PaginationParser,
    page_size: u32,
    max_hops: u32,
}

impl PageDiscoveryService {
    /// Create a new page discovery service
    pub fn new(
        source: Arc<dyn HtmlSource>,
        parser: PaginationParser,
        page_size: u32,
        max_hops: u32,
    ) -> Self {
        Self {
            source,
            parser,
            page_size,
            max_hops,
        }
    }

    pub fn from_config(source: Arc<dyn HtmlSource>, config: &ScraperConfig) -> ScrapeResult<Self> {
        Ok(Self::new(
            source,
            PaginationParser::new(&config.selectors)?,
            config.site.page_size,
            config.crawl.max_discovery_hops,
        ))
    }

    /// Find the number of result pages for `base_query`.
    ///
    /// The first request goes to `base_query` itself; every re-probe goes to
    /// the candidate page's `start` offset. Fetch failures are returned
    /// as-is. A missing pagination block means a single page.
    pub async fn discover_page_count(
        &self,
        base_query: &str,
        cancel: &CancellationToken,
    ) -> ScrapeResult<PageCount> {
        info!("🔍 Discovering page count...");

        let mut known_last = 1u32;
        let mut url = base_query.to_string();
        let mut hops = 0u32;

        loop {
            let html = self.source.fetch_html(&url, cancel).await?;
            let links = self.parser.link_labels(&html);

            match pagination::evaluate(links.as_deref()) {
                PaginationStep::Absent => {
                    if hops == 0 {
                        info!("📄 No pagination block, treating results as a single page");
                    } else {
                        warn!("⚠️ Pagination block vanished on page {}, stopping", known_last);
                    }
                    break;
                }
                PaginationStep::Terminal => {
                    debug!("Terminal pagination block on page {}", known_last);
                    break;
                }
                PaginationStep::Next(candidate) if candidate > known_last => {
                    if hops >= self.max_hops {
                        warn!(
                            "⚠️ Discovery hop limit ({}) reached at page {}, stopping",
                            self.max_hops, known_last
                        );
                        break;
                    }
                    hops += 1;
                    known_last = candidate;
                    url = utils::page_url(
                        base_query,
                        pagination::page_number_to_index(candidate),
                        self.page_size,
                    );
                    info!("🚀 Hop {}: probing page {}", hops, candidate);
                }
                PaginationStep::Next(candidate) => {
                    debug!(
                        "Candidate page {} does not advance past page {}, stopping",
                        candidate, known_last
                    );
                    break;
                }
                PaginationStep::Unreadable(label) => {
                    warn!("⚠️ Pagination candidate '{}' is not a page number, stopping", label);
                    break;
                }
            }
        }

        let count = PageCount::new(known_last);
        info!("🎯 Found {} result page(s) after {} hop(s)", count, hops);
        Ok(count)
    }
}
