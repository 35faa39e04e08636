//! Application layer module
//!
//! Use cases that drive a scrape: page-count discovery, per-page
//! collection and the run orchestrator.

pub mod orchestrator;
pub mod page_collector;
pub mod page_discovery_service;

pub use orchestrator::{ScrapeOrchestrator, ScrapeReport};
pub use page_collector::PageCollector;
pub use page_discovery_service::PageDiscoveryService;
