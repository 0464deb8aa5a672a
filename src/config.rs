//! Client configuration.
//!
//! Where the agent backend lives and how long to wait for it. Built with the
//! builder methods or read from `CHATSTREAM_*` environment variables.

use std::fmt;
use std::time::Duration;

/// Default agent backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default streaming endpoint path.
pub const DEFAULT_STREAM_PATH: &str = "/api/query/stream";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_URL: &str = "CHATSTREAM_URL";
pub const ENV_STREAM_PATH: &str = "CHATSTREAM_STREAM_PATH";
pub const ENV_TIMEOUT_SECS: &str = "CHATSTREAM_TIMEOUT_SECS";

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is not an absolute http(s) URL
    InvalidUrl { url: String, reason: String },
    /// Timeout value could not be parsed or is zero
    InvalidTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { url, reason } => {
                write!(f, "Invalid base URL '{}': {}", url, reason)
            }
            ConfigError::InvalidTimeout { value } => {
                write!(f, "Invalid timeout '{}': expected a positive number of seconds", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for [`HttpTransport`](crate::adapters::HttpTransport).
///
/// # Example
///
/// ```ignore
/// use chatstream::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://agent.internal:8000")
///     .with_request_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Path of the streaming endpoint (default: /api/query/stream)
    pub stream_path: String,
    /// Timeout for establishing the connection
    pub connect_timeout: Duration,
    /// Timeout for the whole request including the streamed body. None
    /// lets a long answer stream for as long as it takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend origin.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the streaming endpoint path.
    pub fn with_stream_path(mut self, path: impl Into<String>) -> Self {
        self.stream_path = path.into();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set an overall request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Read overrides from `CHATSTREAM_URL`, `CHATSTREAM_STREAM_PATH` and
    /// `CHATSTREAM_TIMEOUT_SECS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup(ENV_STREAM_PATH).filter(|v| !v.trim().is_empty()) {
            config.stream_path = path.trim().to_string();
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Some(parse_timeout_secs(&value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.stream_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

fn parse_timeout_secs(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}
