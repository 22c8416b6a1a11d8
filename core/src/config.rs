//! Client configuration.
//!
//! Built once at process start and handed to `ApiClient::new`. Values come
//! from the environment (optionally seeded from a `.env` file) with a local
//! development fallback.

use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;
use crate::query::Dialect;

/// Base URL used when `BACKEND_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8082";

pub const BASE_URL_VAR: &str = "BACKEND_URL";
pub const DIALECT_VAR: &str = "BACKEND_DIALECT";
pub const TIMEOUT_VAR: &str = "BACKEND_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    pub dialect: Dialect,
    /// Per-request timeout handed to the HTTP client. `None` leaves requests
    /// unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config for `base_url`; trailing slashes are stripped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            dialect: Dialect::default(),
            timeout: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Load from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "{BASE_URL_VAR} must be an http(s) URL, got {base_url}"
            )));
        }

        let mut config = Self::new(&base_url);
        if let Some(dialect) = get(DIALECT_VAR) {
            config.dialect = dialect.parse()?;
        }
        if let Some(secs) = get(TIMEOUT_VAR) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{TIMEOUT_VAR} must be whole seconds, got {secs}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
