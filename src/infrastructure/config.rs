//! Configuration infrastructure
//!
//! One explicit [`ScraperConfig`] value drives a run. It is built from
//! defaults, an optional config file and `JOB_SCRAPER_*` environment
//! variables, then handed to the orchestrator by value.
//!
//! Configuration is organized into sections:
//! 1. `site` - target host, paths and page size
//! 2. `http` - client behaviour (timeouts, rate limit)
//! 3. `crawl` - concurrency bounds and failure policy
//! 4. `selectors` - the HTML contract the parser depends on
//! 5. `output`, `server`, `logging`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::{ScrapeError, ScrapeResult};
use crate::domain::pagination::start_offset;

/// Environment prefix, e.g. `JOB_SCRAPER_SITE__PAGE_SIZE=25`.
pub const ENV_PREFIX: &str = "JOB_SCRAPER";

/// Config file looked up in the working directory (any extension the
/// `config` crate understands: `job-scraper.toml`, `job-scraper.json`, ...).
pub const LOCAL_CONFIG_NAME: &str = "job-scraper";

/// Complete scraper configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub crawl: CrawlConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Target site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme + host, no trailing slash
    pub base_url: String,

    /// Path of the search results listing
    pub search_path: String,

    /// Path of the job detail page
    pub detail_path: String,

    /// Listings requested per page (`limit` query parameter)
    pub page_size: u32,

    /// Search term used by the standalone run
    pub default_term: String,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Deadline for a single request, connect through body
    pub timeout_seconds: u64,

    /// Global request rate; 0 disables throttling
    pub max_requests_per_second: u32,

    pub follow_redirects: bool,
}

/// What a failed page does to the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First failure cancels all in-flight work and fails the run.
    #[default]
    FailFast,
    /// Network and status failures drop the page; the run continues.
    SkipFailedPages,
}

/// Crawl settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Pages fetched at once; 0 fans out every page immediately
    pub max_concurrent_pages: usize,

    /// Cards extracted at once within a page; 0 is unbounded
    pub max_concurrent_cards: usize,

    /// Upper bound on pagination re-probes
    pub max_discovery_hops: u32,

    pub failure_policy: FailurePolicy,
}

/// CSS selectors for result pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub job_card: String,
    pub job_id_attribute: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub pagination: String,
    pub pagination_link: String,
}

/// Output sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
}

/// Trigger server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    pub file_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            search_path: defaults::SEARCH_PATH.to_string(),
            detail_path: defaults::DETAIL_PATH.to_string(),
            page_size: defaults::PAGE_SIZE,
            default_term: defaults::SEARCH_TERM.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            follow_redirects: true,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: defaults::MAX_CONCURRENT_PAGES,
            max_concurrent_cards: defaults::MAX_CONCURRENT_CARDS,
            max_discovery_hops: defaults::MAX_DISCOVERY_HOPS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            job_card: defaults::selectors::JOB_CARD.to_string(),
            job_id_attribute: defaults::selectors::JOB_ID_ATTRIBUTE.to_string(),
            title: defaults::selectors::TITLE.to_string(),
            company_name: defaults::selectors::COMPANY_NAME.to_string(),
            location: defaults::selectors::LOCATION.to_string(),
            pagination: defaults::selectors::PAGINATION.to_string(),
            pagination_link: defaults::selectors::PAGINATION_LINK.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(defaults::CSV_PATH),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Standard lookup: `job-scraper.*` in the working directory, then the
    /// user config directory, then environment overrides.
    pub fn load() -> ScrapeResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(LOCAL_CONFIG_NAME).required(false));

        if let Some(user_file) = Self::user_config_file() {
            builder = builder.add_source(
                config::File::with_name(&user_file.to_string_lossy()).required(false),
            );
        }

        let settings = builder.add_source(Self::environment()).build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file plus environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    /// `<user config dir>/job-scraper/config` (extension resolved by `config`).
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("job-scraper").join("config"))
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        if self.site.page_size == 0 {
            return Err(ScrapeError::Config("site.page_size must be greater than 0".into()));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(ScrapeError::Config("site.base_url must not be empty".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ScrapeError::Config("http.timeout_seconds must be greater than 0".into()));
        }
        if self.crawl.max_discovery_hops == 0 {
            return Err(ScrapeError::Config(
                "crawl.max_discovery_hops must be greater than 0".into(),
            ));
        }

        let selectors = [
            ("selectors.job_card", &self.selectors.job_card),
            ("selectors.job_id_attribute", &self.selectors.job_id_attribute),
            ("selectors.title", &self.selectors.title),
            ("selectors.company_name", &self.selectors.company_name),
            ("selectors.location", &self.selectors.location),
            ("selectors.pagination", &self.selectors.pagination),
            ("selectors.pagination_link", &self.selectors.pagination_link),
        ];
        for (name, value) in selectors {
            if value.trim().is_empty() {
                return Err(ScrapeError::Config(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }

    /// Point every site URL at another host (used for local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.site.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl SiteConfig {
    /// Base query for a search term: `<host>/jobs?q=<term>&limit=<size>`.
    pub fn search_url(&self, term: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
        format!(
            "{}{}?q={}&limit={}",
            self.base_url.trim_end_matches('/'),
            self.search_path,
            encoded,
            self.page_size
        )
    }

    /// Prefix that a job id is appended to: `<host>/viewjob?jk=`.
    pub fn detail_url_prefix(&self) -> String {
        format!("{}{}?jk=", self.base_url.trim_end_matches('/'), self.detail_path)
    }
}

/// Default scraper configuration values
pub mod defaults {
    /// Target host
    pub const BASE_URL: &str = "https://www.indeed.com";

    /// Search listing path
    pub const SEARCH_PATH: &str = "/jobs";

    /// Detail page path
    pub const DETAIL_PATH: &str = "/viewjob";

    /// Listings per page
    pub const PAGE_SIZE: u32 = 50;

    /// Search term for the standalone run
    pub const SEARCH_TERM: &str = "python";

    pub const USER_AGENT: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// No throttling unless configured
    pub const MAX_REQUESTS_PER_SECOND: u32 = 0;

    /// Unbounded page fan-out
    pub const MAX_CONCURRENT_PAGES: usize = 0;

    /// Unbounded card fan-out
    pub const MAX_CONCURRENT_CARDS: usize = 0;

    pub const MAX_DISCOVERY_HOPS: u32 = 50;

    pub const CSV_PATH: &str = "jobs.csv";

    pub const BIND_ADDRESS: &str = "127.0.0.1:8080";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "job-scraper.log";

    /// The result-page HTML contract
    pub mod selectors {
        pub const JOB_CARD: &str = ".tapItem";
        pub const JOB_ID_ATTRIBUTE: &str = "data-jk";
        pub const TITLE: &str = "h2>span";
        pub const COMPANY_NAME: &str = ".companyName";
        pub const LOCATION: &str = "div pre";
        pub const PAGINATION: &str = ".pagination";
        pub const PAGINATION_LINK: &str = "a";
    }
}

/// URL building helper functions
pub mod utils {
    use super::start_offset;

    /// Append the `start` offset for a page index to a base query.
    pub fn page_url(base_query: &str, page_index: u32, page_size: u32) -> String {
        format!("{base_query}&start={}", start_offset(page_index, page_size))
    }
}
