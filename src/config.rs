// ABOUTME: Configuration for the CRM client and the phone validator.
// ABOUTME: Loaded from environment variables or a JSON file; secrets never live in source.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CRM_API_BASE: &str = "https://sync.realnex.com";
pub const DEFAULT_VALIDATOR_URL: &str = "https://api.phonevalidator.com/api/v3/phonesearch";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VALIDATOR_BATCH_SIZE: usize = 25;

/// Connection settings for the CRM API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrmConfig {
    #[serde(default = "default_api_base", alias = "apiBase")]
    pub api_base: String,
    #[serde(alias = "authorization")]
    pub token: String,
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default, alias = "selectedDb", alias = "selectedDatabase")]
    pub selected_db: Option<String>,
    /// Request timeout. Unset means fetches wait indefinitely.
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_CRM_API_BASE.to_string()
}

impl CrmConfig {
    /// Create a config with just a bearer token against the default API base.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: default_api_base(),
            token: token.into(),
            cookie: None,
            selected_db: None,
            timeout_secs: None,
        }
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn selected_db(mut self, selected_db: impl Into<String>) -> Self {
        self.selected_db = Some(selected_db.into());
        self
    }

    /// Load from `REALNEX_TOKEN`, `REALNEX_COOKIE`, `REALNEX_SELECTED_DB`,
    /// `REALNEX_API_BASE` and `REALNEX_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, "REALNEX_TOKEN")?;
        let timeout_secs = optional(&lookup, "REALNEX_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("REALNEX_TIMEOUT_SECS", &raw))
            .transpose()?;

        Ok(Self {
            api_base: optional(&lookup, "REALNEX_API_BASE").unwrap_or_else(default_api_base),
            token,
            cookie: optional(&lookup, "REALNEX_COOKIE"),
            selected_db: optional(&lookup, "REALNEX_SELECTED_DB"),
            timeout_secs,
        })
    }

    /// Load from a JSON file holding the same fields.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        if config.token.trim().is_empty() {
            return Err(ConfigError::Missing("token".to_string()));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Settings for the phone validation API and batch pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub batch_size: usize,
}

impl ValidatorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_VALIDATOR_URL.to_string(),
            timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            batch_size: DEFAULT_VALIDATOR_BATCH_SIZE,
        }
    }

    /// Load from `PHONE_VALIDATOR_API_KEY`, `PHONE_VALIDATOR_URL` and
    /// `PHONE_VALIDATOR_BATCH_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(required(&lookup, "PHONE_VALIDATOR_API_KEY")?);
        if let Some(url) = optional(&lookup, "PHONE_VALIDATOR_URL") {
            config.api_url = url;
        }
        if let Some(raw) = optional(&lookup, "PHONE_VALIDATOR_BATCH_SIZE") {
            let batch_size = parse_number::<usize>("PHONE_VALIDATOR_BATCH_SIZE", &raw)?;
            if batch_size == 0 {
                return Err(ConfigError::Invalid {
                    key: "PHONE_VALIDATOR_BATCH_SIZE".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.batch_size = batch_size;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        message: e.to_string(),
    })
}
