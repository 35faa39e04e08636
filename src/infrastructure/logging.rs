//! Logging system configuration and initialization
//!
//! Console and optional file output through `tracing-subscriber`, with
//! optional JSON formatting. `RUST_LOG` overrides the configured level.

use anyhow::{Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the process lifetime
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Local wall-clock timestamps with milliseconds
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Default log directory: `logs/` next to the executable
pub fn get_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        .join("logs")
}

/// Initialize logging with custom configuration
///
/// HTTP and runtime internals are turned down unless the level is `trace`.
/// Override with `RUST_LOG`, for example:
/// ```bash
/// RUST_LOG="debug,reqwest=debug,hyper=debug" job-scraper
/// ```
///
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console_output {
        let layer = if config.json_format {
            fmt::layer()
                .json()
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_filter(build_filter(config)?)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_filter(build_filter(config)?)
                .boxed()
        };
        layers.push(layer);
    }

    if config.file_output {
        let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let file_appender = rolling::never(&log_dir, &config.file_name);
        let (file_writer, file_guard) = non_blocking(file_appender);
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(file_guard);
        }

        let layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_filter(build_filter(config)?)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false)
                .with_filter(build_filter(config)?)
                .boxed()
        };
        layers.push(layer);
    }

    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        debug!("Logging already initialized");
    }
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for directive in ["reqwest=info", "hyper=warn", "hyper_util=warn", "h2=warn", "tokio=info", "runtime=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = LoggingConfig {
            console_output: false,
            ..Default::default()
        };
        assert!(init_logging_with_config(&config).is_ok());
        assert!(init_logging_with_config(&config).is_ok());
    }

    #[test]
    fn bad_level_is_rejected() {
        let config = LoggingConfig {
            level: "info,job_scraper=loudest".to_string(),
            ..Default::default()
        };
        // RUST_LOG would bypass the configured level
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(build_filter(&config).is_err());
        }
    }

    #[test]
    fn file_output_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let config = LoggingConfig {
            console_output: false,
            file_output: true,
            log_dir: Some(log_dir.clone()),
            ..Default::default()
        };
        init_logging_with_config(&config).unwrap();
        assert!(log_dir.is_dir());
    }
}
