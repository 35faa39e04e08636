//! Job Scraper - concurrent job-listing scraper
//!
//! Discovers how many result pages a search has, fetches every page
//! concurrently, extracts one record per job card and writes the aggregate
//! as CSV. Also exposes the run behind a small HTTP trigger.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod server;

#[cfg(test)]
mod test_utils;

pub use application::{ScrapeOrchestrator, ScrapeReport};
pub use domain::JobRecord;
pub use infrastructure::{ScrapeError, ScrapeResult, ScraperConfig};
