//! Runtime configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use simplelog::LevelFilter;
use thiserror::Error;
use userlist_lib::api::query::DEFAULT_PAGE_SIZE;

/// Environment variable overriding [`Config::api_url`].
pub const ENV_API_URL: &str = "USERLIST_API_URL";
/// Environment variable overriding [`Config::page_size`].
pub const ENV_PAGE_SIZE: &str = "USERLIST_PAGE_SIZE";
/// Environment variable overriding [`Config::log_level`].
pub const ENV_LOG_LEVEL: &str = "USERLIST_LOG_LEVEL";

const DEFAULT_API_URL: &str = "https://dummyjson.com";
const DEFAULT_CITIES: [&str; 4] = ["Columbus", "Chicago", "New York", "San Francisco"];

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the users API.
    pub api_url: String,

    /// Users requested per page.
    pub page_size: u32,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Log verbosity.
    pub log_level: LevelFilter,

    /// Cities offered by the country filter.
    pub cities: Vec<String>,

    /// Where the HTML export is written.
    pub markup_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
            log_level: LevelFilter::Debug,
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            markup_file: PathBuf::from("userlist.html"),
        }
    }
}

impl Config {
    /// Defaults overridden by `USERLIST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(invalid(ENV_PAGE_SIZE, raw)),
            };
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LevelFilter::from_str(&raw).map_err(|_| invalid(ENV_LOG_LEVEL, raw))?;
        }
        Ok(self)
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the HTML export path.
    pub fn markup_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.markup_file = path.into();
        self
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}
