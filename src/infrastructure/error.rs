//! Scrape error types
//!
//! Every failure in the pipeline is a [`ScrapeError`] value returned to the
//! caller. Nothing in the library terminates the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request failed with status {status}: {url}")]
    Fetch { url: String, status: u16 },

    #[error("Parse error ({context}): {message}")]
    Parse { context: String, message: String },

    #[error("Scrape cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Task failed: {0}")]
    Task(String),
}

impl ScrapeError {
    pub fn network(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn fetch(url: &str, status: u16) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status,
        }
    }

    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Errors a page can be skipped for under
    /// [`FailurePolicy::SkipFailedPages`](crate::infrastructure::config::FailurePolicy).
    pub fn is_page_isolatable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Fetch { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<tokio::task::JoinError> for ScrapeError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Task(err.to_string())
        }
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolatable_kinds() {
        assert!(ScrapeError::network("http://x", "connection reset").is_page_isolatable());
        assert!(ScrapeError::fetch("http://x", 503).is_page_isolatable());
        assert!(!ScrapeError::parse("page 0", "empty body").is_page_isolatable());
        assert!(!ScrapeError::Cancelled.is_page_isolatable());
    }

    #[test]
    fn fetch_error_message_names_status() {
        let err = ScrapeError::fetch("https://www.indeed.com/jobs?q=go", 403);
        assert_eq!(
            err.to_string(),
            "Request failed with status 403: https://www.indeed.com/jobs?q=go"
        );
    }
}
