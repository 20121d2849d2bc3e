use std::str::FromStr;
use std::time::Duration;

use validator::Validate;

/// Default backend address for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8009";

/// Backend client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, Validate)]
pub struct ClientConfig {
    /// Backend base URL, without the `/files` prefix.
    #[validate(url)]
    pub base_url: String,
    /// Per-request timeout in seconds (default: `30`).
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    /// Size of the chunks an upload body is streamed in (default: 64 KiB).
    #[validate(range(min = 1024))]
    pub upload_chunk_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            upload_chunk_bytes: 64 * 1024,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `SHEETFLOW_API_URL`              | `http://localhost:8009` |
    /// | `SHEETFLOW_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `SHEETFLOW_UPLOAD_CHUNK_BYTES`   | `65536`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            base_url: env_or("SHEETFLOW_API_URL", defaults.base_url)?,
            request_timeout_secs: env_or(
                "SHEETFLOW_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            upload_chunk_bytes: env_or(
                "SHEETFLOW_UPLOAD_CHUNK_BYTES",
                defaults.upload_chunk_bytes,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, trimming any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.validate()?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Read `var` and parse it, falling back to `default` when unset.
pub fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// The assembled configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
