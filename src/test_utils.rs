//! Test utilities for job-scraper
//!
//! An in-memory [`HtmlSource`] keyed by exact URL, with optional per-URL
//! latency and failure status, plus small HTML builders for result pages.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::error::{ScrapeError, ScrapeResult};
use crate::infrastructure::http_client::HtmlSource;

#[derive(Default)]
pub struct FakeHtmlSource {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    /// status, and how many requests succeed before it applies
    failures: HashMap<String, (u16, usize)>,
    malformed: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeHtmlSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_status_after(url, status, 0)
    }

    /// Serve the page `successes` times, then answer with `status`.
    pub fn with_status_after(mut self, url: impl Into<String>, status: u16, successes: usize) -> Self {
        self.failures.insert(url.into(), (status, successes));
        self
    }

    /// Answer `url` with a parse failure.
    pub fn with_parse_error(mut self, url: impl Into<String>) -> Self {
        self.malformed.insert(url.into());
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HtmlSource for FakeHtmlSource {
    async fn fetch_html(&self, url: &str, cancel: &CancellationToken) -> ScrapeResult<String> {
        let previous_hits = {
            let mut requests = self.requests.lock().unwrap();
            let hits = requests.iter().filter(|u| *u == url).count();
            requests.push(url.to_string());
            hits
        };

        if let Some(delay) = self.delays.get(url) {
            tokio::select! {
                () = tokio::time::sleep(*delay) => {},
                () = cancel.cancelled() => return Err(ScrapeError::Cancelled),
            }
        }

        if let Some(&(status, successes)) = self.failures.get(url) {
            if previous_hits >= successes {
                return Err(ScrapeError::fetch(url, status));
            }
        }

        if self.malformed.contains(url) {
            return Err(ScrapeError::parse(url, "malformed document"));
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::fetch(url, 404))
    }
}

/// A card in the default selector layout.
pub fn card(id: Option<&str>, title: &str, company: &str, location: &str) -> String {
    let id_attr = id.map(|id| format!(r#" data-jk="{id}""#)).unwrap_or_default();
    format!(
        r#"<a class="tapItem"{id_attr}><h2><span>{title}</span></h2><span class="companyName">{company}</span><div><pre>{location}</pre></div></a>"#
    )
}

/// A pagination block with one link per label.
pub fn pagination(labels: &[&str]) -> String {
    let links: String = labels.iter().map(|l| format!("<a>{l}</a>")).collect();
    format!(r#"<div class="pagination">{links}</div>"#)
}

/// A full result page from card and pagination fragments.
pub fn result_page(cards: &[String], pagination: Option<&str>) -> String {
    format!(
        "<html><body><div id=\"results\">{}</div>{}</body></html>",
        cards.concat(),
        pagination.unwrap_or_default()
    )
}
