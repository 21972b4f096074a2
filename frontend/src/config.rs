//! Build-time API configuration and persisted display preferences.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

pub const DEFAULT_API_BASE_URL: &str = "https://fcs-api.onrender.com/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

const SETTINGS_KEY: &str = "settings";

/// The errors that may occur while resolving configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("API base URL must start with http:// or https://, got \"{0}\"")]
    InvalidBaseUrl(String),

    /// The timeout is not a positive integer number of milliseconds.
    #[error("request timeout must be a positive number of milliseconds, got \"{0}\"")]
    InvalidTimeout(String),

    #[error("unknown log level \"{0}\"")]
    InvalidLogLevel(String),
}

/// Where the REST API lives and how long a single request may take.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://host/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Read `FCS_API_BASE_URL` and `FCS_API_TIMEOUT_MS` as they were set when
    /// the bundle was compiled. A browser has no process environment, so the
    /// values are baked in.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("FCS_API_BASE_URL"),
            option_env!("FCS_API_TIMEOUT_MS"),
        )
    }

    pub fn from_values(
        base_url: Option<&str>,
        timeout_ms: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let base_url = match base_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) if raw.starts_with("http://") || raw.starts_with("https://") => {
                raw.trim_end_matches('/').to_string()
            }
            Some(raw) => return Err(ConfigError::InvalidBaseUrl(raw.to_string())),
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let timeout = match timeout_ms.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidTimeout(raw.to_string())),
            },
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        Ok(Self { base_url, timeout })
    }

    /// Join a collection path such as `accounts/3/` onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// The maximum level of events the console subscriber records.
pub fn log_level() -> Result<LevelFilter, ConfigError> {
    parse_log_level(option_env!("FCS_LOG_LEVEL"))
}

pub fn parse_log_level(raw: Option<&str>) -> Result<LevelFilter, ConfigError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel(raw.to_string())),
        None if cfg!(debug_assertions) => Ok(LevelFilter::DEBUG),
        None => Ok(LevelFilter::INFO),
    }
}

/// How money is shown. Amounts themselves carry no currency symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub currency_code: String,
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::for_code("BDT")
    }
}

impl DisplaySettings {
    pub fn for_code(code: &str) -> Self {
        Self {
            currency_code: code.to_string(),
            currency_symbol: currency_symbol_for(code).to_string(),
        }
    }
}

pub const CURRENCY_CODES: [&str; 6] = ["BDT", "USD", "EUR", "GBP", "JPY", "PHP"];

pub fn currency_symbol_for(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "PHP" => "₱",
        _ => "৳",
    }
}

pub fn load_display_settings() -> DisplaySettings {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item(SETTINGS_KEY) {
                if let Ok(settings) = serde_json::from_str::<DisplaySettings>(&raw) {
                    return settings;
                }
            }
        }
    }
    DisplaySettings::default()
}

pub fn save_display_settings(settings: &DisplaySettings) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(settings) {
                let _ = storage.set_item(SETTINGS_KEY, &raw);
            }
        }
    }
}
