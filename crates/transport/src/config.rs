//! Environment-driven configuration for the transport.

use std::time::Duration;

use url::Url;

use crate::error::TransportError;

const ENV_RPC_URLS: &str = "RPC_URLS";
const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

/// Background health-monitor tick cadence.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(10);
/// Blocks behind the observed max height before an endpoint is marked stale.
pub const STALE_THRESHOLD: u64 = 3;
/// Default per-call retry ceiling.
pub const DEFAULT_MAX_RETRIES: u32 = 5;
/// Base delay for the exponential backoff retry policy.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Endpoint list and retry tuning for [`crate::Transport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Ordered endpoint URLs; index 0 is the highest-priority and the
    /// safety-valve fallback when every endpoint is unhealthy.
    pub endpoints: Vec<Url>,
    /// Per-call retry attempt ceiling.
    pub max_retries: u32,
}

impl TransportConfig {
    /// Reads `RPC_URLS` (comma-separated). An empty or unset value
    /// falls back to a single public endpoint, with a warning the caller is
    /// expected to log (this crate does not log on behalf of its caller
    /// during construction, only once the transport is running).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Fatal`] if any configured URL fails to parse.
    pub fn from_env() -> Result<Self, TransportError> {
        let raw = std::env::var(ENV_RPC_URLS).unwrap_or_default();
        let endpoints = if raw.trim().is_empty() {
            vec![DEFAULT_RPC_URL.parse().expect("default RPC URL is valid")]
        } else {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Url>().map_err(|e| TransportError::Fatal(format!("{s}: {e}"))))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Self { endpoints, max_retries: DEFAULT_MAX_RETRIES })
    }

    /// Whether `from_env` fell back to the default because `RPC_URLS`
    /// was unset or empty.
    pub fn used_default(&self) -> bool {
        self.endpoints.len() == 1 && self.endpoints[0].as_str() == DEFAULT_RPC_URL
    }
}
