//! Job card parser
//!
//! Splits a result page into card fragments and turns each fragment into a
//! [`JobRecord`]. Field extraction never fails: missing elements or
//! attributes produce empty strings.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::compile_selector;
use crate::domain::{JobRecord, text::clean_text};
use crate::infrastructure::config::SelectorConfig;
use crate::infrastructure::error::ScrapeResult;

/// Parser for job cards on a result page
#[derive(Debug)]
pub struct JobCardParser {
    card: Selector,
    title: Selector,
    company_name: Selector,
    location: Selector,
    id_attribute: String,
}

impl JobCardParser {
    /// Create parser with custom selector configuration
    pub fn new(selectors: &SelectorConfig) -> ScrapeResult<Self> {
        Ok(Self {
            card: compile_selector("selectors.job_card", &selectors.job_card)?,
            title: compile_selector("selectors.title", &selectors.title)?,
            company_name: compile_selector("selectors.company_name", &selectors.company_name)?,
            location: compile_selector("selectors.location", &selectors.location)?,
            id_attribute: selectors.job_id_attribute.clone(),
        })
    }

    /// Outer HTML of every card on the page, in document order.
    ///
    /// The parsed page is dropped before this returns, so the fragments can
    /// be moved into independent tasks.
    pub fn card_fragments(&self, page_html: &str) -> Vec<String> {
        let document = Html::parse_document(page_html);
        let fragments: Vec<String> = document.select(&self.card).map(|card| card.html()).collect();
        debug!("Found {} job cards", fragments.len());
        fragments
    }

    /// Build a record from one card fragment.
    pub fn extract_record(&self, card_html: &str) -> JobRecord {
        let fragment = Html::parse_fragment(card_html);
        let card = fragment
            .select(&self.card)
            .next()
            .unwrap_or_else(|| fragment.root_element());
        self.extract_from_element(card)
    }

    fn extract_from_element(&self, card: ElementRef<'_>) -> JobRecord {
        let id = card
            .value()
            .attr(&self.id_attribute)
            .unwrap_or_default()
            .to_string();

        let record = JobRecord {
            id,
            title: Self::selected_text(card, &self.title),
            company_name: Self::selected_text(card, &self.company_name),
            location: Self::selected_text(card, &self.location),
        };
        if !record.has_id() {
            debug!("Card without {} attribute: '{}'", self.id_attribute, record.title);
        }
        record
    }

    /// Text of every match concatenated, then normalized.
    fn selected_text(card: ElementRef<'_>, selector: &Selector) -> String {
        let raw: String = card.select(selector).flat_map(|el| el.text()).collect();
        clean_text(&raw)
    }
}
