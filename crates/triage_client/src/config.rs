//! Environment-sourced API configuration.
//!
//! Configuration is read from the process environment (with `.env` support
//! via dotenvy) and validated before any dependent component is
//! constructed. Positive-integer fields use `NonZero` types, so a zero
//! quota or retry budget fails at parse time rather than surfacing as a
//! degenerate runtime configuration.

use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;

use config::{Config, Environment};
use derive_getters::Getters;
use serde::Deserialize;
use tracing::{debug, instrument};
use triage_error::{ConfigError, TriageResult};

/// Default base URL of the generative-model API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_MAX_RETRIES: NonZeroU32 = NonZeroU32::new(3).unwrap();
const DEFAULT_TIMEOUT_MS: NonZeroU64 = NonZeroU64::new(30_000).unwrap();
const DEFAULT_RATE_LIMIT_PER_MINUTE: NonZeroU32 = NonZeroU32::new(60).unwrap();

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> NonZeroU32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_ms() -> NonZeroU64 {
    DEFAULT_TIMEOUT_MS
}

fn default_rate_limit_per_minute() -> NonZeroU32 {
    DEFAULT_RATE_LIMIT_PER_MINUTE
}

/// Validated API configuration.
///
/// Sourced from `GEMINI_API_KEY`, `API_BASE_URL`, `MAX_RETRIES`,
/// `TIMEOUT_MS`, and `RATE_LIMIT_PER_MINUTE`. Only the API key is
/// required; everything else defaults.
///
/// # Examples
///
/// ```
/// use triage_client::ApiConfig;
///
/// let config = ApiConfig::new("test-api-key").unwrap();
/// assert_eq!(config.max_retries().get(), 3);
/// assert_eq!(config.timeout().as_millis(), 30_000);
/// assert_eq!(config.rate_limit_per_minute().get(), 60);
/// ```
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct ApiConfig {
    gemini_api_key: String,
    #[serde(default = "default_base_url")]
    api_base_url: String,
    #[serde(default = "default_max_retries")]
    max_retries: NonZeroU32,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: NonZeroU64,
    #[serde(default = "default_rate_limit_per_minute")]
    rate_limit_per_minute: NonZeroU32,
}

impl ApiConfig {
    /// Create a configuration with the given API key and defaults for
    /// everything else.
    pub fn new(gemini_api_key: impl Into<String>) -> TriageResult<Self> {
        let config = Self {
            gemini_api_key: gemini_api_key.into(),
            api_base_url: default_base_url(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from the process environment.
    ///
    /// Reads a `.env` file first when one is present. Fails fast on a
    /// missing or empty API key, a malformed URL, or a non-positive
    /// integer field, so dependent components are never constructed from a
    /// bad configuration.
    #[instrument]
    pub fn from_env() -> TriageResult<Self> {
        dotenvy::dotenv().ok();

        debug!("Loading API configuration from environment");

        let config: ApiConfig = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()
            .map_err(|e| {
                ConfigError::new(format!("Failed to read environment configuration: {}", e))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Override the retry budget.
    pub fn with_max_retries(mut self, max_retries: NonZeroU32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: NonZeroU64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Override the per-minute request quota.
    pub fn with_rate_limit_per_minute(mut self, rate_limit_per_minute: NonZeroU32) -> Self {
        self.rate_limit_per_minute = rate_limit_per_minute;
        self
    }

    /// Check invariants the type system cannot express.
    pub fn validate(&self) -> TriageResult<()> {
        if self.gemini_api_key.trim().is_empty() {
            Err(ConfigError::new("GEMINI_API_KEY must not be empty"))?;
        }
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::new(format!(
                "API_BASE_URL '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;
        Ok(())
    }

    /// Per-attempt timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.get())
    }
}
