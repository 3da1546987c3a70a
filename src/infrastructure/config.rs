//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional config file, then `LISTING_SCOUT_*` environment variables
//! (nested keys separated by `__`, e.g. `LISTING_SCOUT_SCRAPER__MAX_PAGES=5`).

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default values for every setting
pub mod defaults {
    /// Warsaw apartments for sale, private owners only, newest first
    pub const FEED_URL: &str = "https://www.otodom.pl/pl/wyniki/sprzedaz/mieszkanie/mazowieckie/warszawa/warszawa/warszawa?limit=36&ownerTypeSingleSelect=PRIVATE&by=DEFAULT&direction=DESC";
    pub const MAX_RESULTS: usize = 50;
    pub const MAX_PAGES: u32 = 3;
    pub const PAGE_LOAD_WAIT_MS: u64 = 2000;
    pub const ITEM_DELAY_MS: u64 = 2000;

    pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const MAX_REQUESTS_PER_SECOND: u32 = 2;
    pub const FOLLOW_REDIRECTS: bool = true;

    pub const OUTPUT_FOLDER: &str = "data";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_DIR: &str = "logs";
}

/// Prefix of environment variables overriding the config
pub const ENV_PREFIX: &str = "LISTING_SCOUT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Limits and pacing of one scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// First feed page; later pages append `page=N`
    pub feed_url: String,

    /// Quota of detail links to collect (and records to scrape)
    pub max_results: usize,

    /// Page budget for feed pagination
    pub max_pages: u32,

    /// Fixed wait after every navigation, for client-side rendering
    pub page_load_wait_ms: u64,

    /// Fixed delay between successive detail-page visits
    pub item_delay_ms: u64,
}

/// HTTP page driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
    pub follow_redirects: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory CSV files are written into (created on demand)
    pub folder: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted console logs
    pub json_format: bool,

    /// Also write logs to a daily rolling file
    pub file_output: bool,

    /// Directory for log files
    pub log_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            feed_url: defaults::FEED_URL.to_string(),
            max_results: defaults::MAX_RESULTS,
            max_pages: defaults::MAX_PAGES,
            page_load_wait_ms: defaults::PAGE_LOAD_WAIT_MS,
            item_delay_ms: defaults::ITEM_DELAY_MS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            follow_redirects: defaults::FOLLOW_REDIRECTS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(defaults::OUTPUT_FOLDER),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
        }
    }
}

impl ScraperConfig {
    pub fn page_load_wait(&self) -> Duration {
        Duration::from_millis(self.page_load_wait_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    /// Settings with all waits zeroed, for replaying canned pages
    pub fn without_waits(mut self) -> Self {
        self.page_load_wait_ms = 0;
        self.item_delay_ms = 0;
        self
    }
}

impl AppConfig {
    /// Load defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings a run cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let feed_url = self.scraper.feed_url.trim();
        if feed_url.is_empty() {
            return Err(ConfigError::validation("scraper.feed_url must not be empty"));
        }
        if let Err(e) = url::Url::parse(feed_url) {
            return Err(ConfigError::validation(format!(
                "scraper.feed_url is not a valid URL: {}",
                e
            )));
        }

        if self.http.max_requests_per_second == 0 {
            return Err(ConfigError::validation(
                "http.max_requests_per_second must be greater than 0",
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds must be greater than 0",
            ));
        }

        Ok(())
    }
}
