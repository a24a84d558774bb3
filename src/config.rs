//! Gateway and aggregator configuration
//!
//! One explicit config per component, constructed once and passed by
//! value; no process-wide singletons. The API credential is read from the
//! environment by `GatewayConfig::from_env`.

use crate::error::RemoteServiceError;
use std::time::Duration;

/// Default Steam Web API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Environment variable holding the Steam Web API key
pub const API_KEY_ENV: &str = "STEAM_API_KEY";

/// Environment variable overriding the API base URL (mainly for tests)
pub const BASE_URL_ENV: &str = "STEAM_API_BASE_URL";

/// Configuration for the remote data gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base endpoint, without a trailing slash
    pub base_url: String,
    /// Static API credential appended to every call
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Build a config with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Read the credential (and optional base URL override) from the
    /// environment. Fails when `STEAM_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, RemoteServiceError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RemoteServiceError::Config(format!("{API_KEY_ENV} is not set"))
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        Ok(config)
    }

    /// Override the base endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Configuration for the per-title achievement scan.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Worker pool width for concurrent achievement lookups
    pub workers: usize,
    /// Delay each worker waits between titles, to respect the service's
    /// implicit rate limit. Steady-state request rate is
    /// `workers / per_call_delay`.
    pub per_call_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            per_call_delay: Duration::from_millis(300),
        }
    }
}

impl AggregatorConfig {
    /// Set the worker pool width (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the inter-title delay per worker.
    pub fn with_per_call_delay(mut self, delay: Duration) -> Self {
        self.per_call_delay = delay;
        self
    }
}
