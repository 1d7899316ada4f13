//! Client configuration: where the movie service lives and how long to wait for it.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// No cap on response bodies unless one is configured.
pub const DEFAULT_MAX_BODY_BYTES: u64 = u64::MAX;

/// Errors during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base URL must start with http:// or https://, got: {0}")]
    InvalidBaseUrl(String),

    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Immutable connection settings handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Bodies longer than this are rejected as unreadable.
    pub max_body_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no http(s) scheme.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    /// Load from `MOVIES_BASE_URL`, `MOVIES_{CONNECT,READ,WRITE}_TIMEOUT_MS`
    /// and `MOVIES_MAX_BODY_BYTES`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("MOVIES_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;
        if let Some(timeout) = timeout_from_env("MOVIES_CONNECT_TIMEOUT_MS")? {
            config.connect_timeout = timeout;
        }
        if let Some(timeout) = timeout_from_env("MOVIES_READ_TIMEOUT_MS")? {
            config.read_timeout = timeout;
        }
        if let Some(timeout) = timeout_from_env("MOVIES_WRITE_TIMEOUT_MS")? {
            config.write_timeout = timeout;
        }
        if let Some(limit) = number_from_env("MOVIES_MAX_BODY_BYTES")? {
            config.max_body_bytes = limit;
        }
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

fn timeout_from_env(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    number_from_env(var).map(|millis| millis.map(Duration::from_millis))
}

fn number_from_env(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_number(var, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
