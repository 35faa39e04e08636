//! HTTP client for result-page fetching with rate limiting and cancellation
//!
//! Every request carries a deadline (client timeout) and races the run's
//! cancellation token, so a failed run releases its sockets promptly.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use tokio_util::sync::CancellationToken;

use super::config::HttpConfig;
use super::error::{ScrapeError, ScrapeResult};

/// Raw HTML retrieval, the seam the discovery and page services depend on.
#[async_trait]
pub trait HtmlSource: Send + Sync {
    /// GET `url` and return the body. Non-2xx is a [`ScrapeError::Fetch`].
    async fn fetch_html(&self, url: &str, cancel: &CancellationToken) -> ScrapeResult<String>;
}

/// reqwest-backed [`HtmlSource`] with an optional global rate limit
pub struct HttpClient {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| ScrapeError::Config(format!("Failed to create HTTP client: {e}")))?;

        let rate_limiter = NonZeroU32::new(config.max_requests_per_second)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl HtmlSource for HttpClient {
    async fn fetch_html(&self, url: &str, cancel: &CancellationToken) -> ScrapeResult<String> {
        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        if let Some(limiter) = &self.rate_limiter {
            tokio::select! {
                () = limiter.until_ready() => {},
                () = cancel.cancelled() => return Err(ScrapeError::Cancelled),
            }
        }

        tracing::info!("{}", url);

        let response = tokio::select! {
            result = self.client.get(url).send() => {
                result.map_err(|e| describe_network_error(url, &e))?
            },
            () = cancel.cancelled() => {
                tracing::debug!("🛑 HTTP request cancelled for URL: {}", url);
                return Err(ScrapeError::Cancelled);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!("❌ Request failed with status {}: {}", status, url);
            return Err(ScrapeError::fetch(url, status.as_u16()));
        }

        let body = tokio::select! {
            result = response.text() => {
                result.map_err(|e| describe_network_error(url, &e))?
            },
            () = cancel.cancelled() => {
                tracing::debug!("🛑 Response reading cancelled for URL: {}", url);
                return Err(ScrapeError::Cancelled);
            }
        };

        if body.trim().is_empty() {
            tracing::debug!("Empty response body for {}", url);
        }

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

fn describe_network_error(url: &str, err: &reqwest::Error) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::network(url, format!("request timed out: {err}"))
    } else {
        ScrapeError::network(url, err)
    }
}
