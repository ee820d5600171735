//! Polling cadence and backoff tuning for the ingestion loop.

use std::time::Duration;

const ENV_POLL_INTERVAL_SECS: &str = "INDEXER_POLL_INTERVAL_SECS";
const ENV_ERROR_BACKOFF_SECS: &str = "INDEXER_ERROR_BACKOFF_SECS";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Timing knobs for [`crate::run`].
#[derive(Debug, Clone, Copy)]
pub struct IngestionConfig {
    /// How long `AtHead` sleeps before re-checking the chain head.
    pub poll_interval: Duration,
    /// Fixed sleep after any iteration-level error before resuming.
    pub error_backoff: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, error_backoff: DEFAULT_ERROR_BACKOFF }
    }
}

impl IngestionConfig {
    /// Reads overrides from the environment, falling back to the defaults
    /// (2s poll, 5s error backoff) for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(ENV_POLL_INTERVAL_SECS) {
            if let Ok(secs) = raw.parse() {
                config.poll_interval = Duration::from_secs(secs);
            }
        }
        if let Ok(raw) = std::env::var(ENV_ERROR_BACKOFF_SECS) {
            if let Ok(secs) = raw.parse() {
                config.error_backoff = Duration::from_secs(secs);
            }
        }
        config
    }
}
