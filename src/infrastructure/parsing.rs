//! HTML parsing infrastructure
//!
//! Parsers are built once per run from [`SelectorConfig`] and shared across
//! tasks. Parsed documents never leave the function that created them; only
//! owned strings and records cross task boundaries.

pub mod job_card_parser;
pub mod pagination_parser;

pub use job_card_parser::JobCardParser;
pub use pagination_parser::PaginationParser;

use scraper::Selector;

use super::error::{ScrapeError, ScrapeResult};

/// Compile a configured selector, naming the config key on failure.
pub(crate) fn compile_selector(name: &str, selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        ScrapeError::parse(
            format!("selector {name}"),
            format!("invalid CSS selector '{selector}': {e}"),
        )
    })
}
