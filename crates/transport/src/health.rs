//! Background health monitoring of the configured endpoints.
//!
//! Grounded on the node's `L1WatcherRpc` shape: a background task owns the
//! only mutable handle to shared state, foreground callers only read it.

use std::sync::Arc;

use alloy_provider::Provider;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{HEALTH_CHECK_INTERVAL, STALE_THRESHOLD};

/// Health of one configured endpoint, as last observed by the monitor.
#[derive(Debug, Clone)]
pub struct EndpointHealth {
    pub url: Url,
    pub healthy: bool,
}

/// Shared, read-mostly health state. The monitor task is the sole writer;
/// [`crate::Transport`] only reads it when routing a call.
#[derive(Debug, Clone)]
pub struct HealthState {
    inner: Arc<RwLock<Vec<EndpointHealth>>>,
}

impl HealthState {
    pub(crate) fn new(urls: &[Url]) -> Self {
        let initial =
            urls.iter().map(|url| EndpointHealth { url: url.clone(), healthy: true }).collect();
        Self { inner: Arc::new(RwLock::new(initial)) }
    }

    /// A point-in-time snapshot for routing a single call.
    pub async fn snapshot(&self) -> Vec<EndpointHealth> {
        self.inner.read().await.clone()
    }
}

/// Polls every configured endpoint's block height on a fixed cadence and
/// updates [`HealthState`] accordingly.
pub struct HealthMonitor<P> {
    providers: Vec<P>,
    state: HealthState,
}

impl<P: Provider + Clone + Send + Sync + 'static> HealthMonitor<P> {
    pub(crate) fn new(providers: Vec<P>, state: HealthState) -> Self {
        Self { providers, state }
    }

    /// Runs the monitor loop until `cancellation` fires.
    pub async fn run(self, cancellation: CancellationToken) {
        let mut ticker = tokio::time::interval(HEALTH_CHECK_INTERVAL);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                _ = cancellation.cancelled() => {
                    tracing::info!("health monitor shutting down");
                    return;
                }
            }
        }
    }

    async fn tick(&self) {
        let mut observed = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let height = provider.get_block_number().await.ok();
            observed.push(height);
        }
        let max_height = observed.iter().filter_map(|h| *h).max();

        let mut guard = self.state.inner.write().await;
        for (entry, height) in guard.iter_mut().zip(observed.into_iter()) {
            let now_healthy = is_fresh(height, max_height);
            if entry.healthy != now_healthy {
                if now_healthy {
                    tracing::info!(endpoint = %entry.url, "endpoint recovered, marking healthy");
                } else {
                    tracing::warn!(endpoint = %entry.url, "endpoint stale or unreachable, marking unhealthy");
                }
                entry.healthy = now_healthy;
            }
        }
    }
}

/// An endpoint is fresh if it responded and is within [`STALE_THRESHOLD`]
/// blocks of the observed max height. An endpoint that failed to respond,
/// or a tick where no endpoint responded at all, is never fresh.
fn is_fresh(height: Option<u64>, max_height: Option<u64>) -> bool {
    match (height, max_height) {
        (Some(h), Some(max)) => max.saturating_sub(h) <= STALE_THRESHOLD,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_threshold_is_fresh() {
        assert!(is_fresh(Some(997), Some(1000)));
        assert!(is_fresh(Some(1000), Some(1000)));
    }

    #[test]
    fn beyond_threshold_is_stale() {
        assert!(!is_fresh(Some(996), Some(1000)));
    }

    #[test]
    fn unreachable_endpoint_is_never_fresh() {
        assert!(!is_fresh(None, Some(1000)));
    }

    #[test]
    fn no_successful_observations_marks_everyone_stale() {
        assert!(!is_fresh(Some(1000), None));
    }
}
