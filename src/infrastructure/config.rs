//! Session configuration
//!
//! Fixed constants mirror the values the collector has always used against the
//! floor sheet page; a `floorsheet` config file or `FLOORSHEET_*` environment
//! variables can override any of them.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default values for all session parameters.
pub mod defaults {
    /// Value requested from the page-size dropdown.
    pub const PAGE_SIZE: &str = "500";
    /// Settle delay after submitting the filter form.
    pub const POST_FILTER_DELAY_MS: u64 = 2_000;
    /// Settle delay after advancing to the next page.
    pub const PAGE_SETTLE_DELAY_MS: u64 = 1_000;
    /// Wall-clock budget for the whole session (20 minutes).
    pub const SESSION_DEADLINE_SECS: u64 = 1_200;
    /// Durable artifact holding the collected records.
    pub const STORAGE_FILE: &str = "nepal_stock_floorsheet.json";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Parameters for one collection session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Page size requested from the page-size dropdown, as the raw option
    /// value.
    #[serde(default = "default_page_size")]
    pub page_size: String,

    /// Milliseconds to wait after submitting the filter before the first
    /// fetch.
    #[serde(default = "default_post_filter_delay_ms")]
    pub post_filter_delay_ms: u64,

    /// Milliseconds to wait after each page advance.
    #[serde(default = "default_page_settle_delay_ms")]
    pub page_settle_delay_ms: u64,

    /// Wall-clock budget for the whole session, in seconds.
    #[serde(default = "default_session_deadline_secs")]
    pub session_deadline_secs: u64,

    /// Where the collected records are persisted.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

fn default_page_size() -> String {
    defaults::PAGE_SIZE.to_owned()
}

fn default_post_filter_delay_ms() -> u64 {
    defaults::POST_FILTER_DELAY_MS
}

fn default_page_settle_delay_ms() -> u64 {
    defaults::PAGE_SETTLE_DELAY_MS
}

fn default_session_deadline_secs() -> u64 {
    defaults::SESSION_DEADLINE_SECS
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(defaults::STORAGE_FILE)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            post_filter_delay_ms: default_post_filter_delay_ms(),
            page_settle_delay_ms: default_page_settle_delay_ms(),
            session_deadline_secs: default_session_deadline_secs(),
            storage_path: default_storage_path(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from an optional `floorsheet.{toml,json,yaml}` file
    /// in the working directory, with `FLOORSHEET_*` environment overrides on
    /// top. Missing sources fall back to the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("floorsheet").required(false))
            .add_source(config::Environment::with_prefix("FLOORSHEET"))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page_size must not be empty".to_owned(),
            ));
        }
        if self.session_deadline_secs == 0 {
            return Err(ConfigError::Validation(
                "session_deadline_secs must be positive".to_owned(),
            ));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage_path must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn post_filter_delay(&self) -> Duration {
        Duration::from_millis(self.post_filter_delay_ms)
    }

    pub fn page_settle_delay(&self) -> Duration {
        Duration::from_millis(self.page_settle_delay_ms)
    }

    pub fn session_deadline(&self) -> Duration {
        Duration::from_secs(self.session_deadline_secs)
    }
}
