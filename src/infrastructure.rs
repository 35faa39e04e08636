//! Infrastructure layer: configuration, HTTP, HTML parsing, output and logging

pub mod config;
pub mod csv_export;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod parsing;

pub use config::ScraperConfig;
pub use error::{ScrapeError, ScrapeResult};
pub use http_client::{HtmlSource, HttpClient};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{JobCardParser, PaginationParser};
