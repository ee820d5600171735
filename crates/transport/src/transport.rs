//! The multi-endpoint transport: routing, retry, and the four calls the
//! ingestion loop and backfill driver need.

use std::time::Duration;

use alloy_eips::BlockNumberOrTag;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types_eth::{Block, Header};
use backon::{ExponentialBuilder, Retryable};
use tokio_util::sync::CancellationToken;

use crate::config::{RETRY_BASE_DELAY, TransportConfig};
use crate::error::TransportError;
use crate::health::{HealthMonitor, HealthState};

/// Multi-provider EVM RPC client with stale-filtered routing and per-call
/// retry.
///
/// Constructed once per binary's `main`, then shared behind an `Arc` with
/// the ingestion loop, the backfill driver, and the health monitor task —
/// never a module-level singleton.
#[derive(Debug, Clone)]
pub struct Transport {
    providers: Vec<RootProvider>,
    health: HealthState,
    max_retries: u32,
}

impl Transport {
    /// Builds a transport and its background health monitor from `config`.
    /// The caller owns the returned `JoinHandle`-spawning closure: call
    /// [`Transport::spawn_health_monitor`] once the transport is in place.
    pub fn new(config: &TransportConfig) -> Self {
        let providers: Vec<RootProvider> = config
            .endpoints
            .iter()
            .map(|url| ProviderBuilder::new().connect_http(url.clone()))
            .collect();
        let health = HealthState::new(&config.endpoints);
        Self { providers, health, max_retries: config.max_retries }
    }

    /// Spawns the background health monitor, returning a handle the caller
    /// should await during graceful shutdown.
    pub fn spawn_health_monitor(&self, cancellation: CancellationToken) -> tokio::task::JoinHandle<()> {
        let monitor = HealthMonitor::new(self.providers.clone(), self.health.clone());
        tokio::spawn(monitor.run(cancellation))
    }

    /// Current chain head block number, per the first-healthy endpoint.
    pub async fn current_head(&self) -> Result<u64, TransportError> {
        self.call(|provider| async move { provider.get_block_number().await }).await
    }

    /// The chain id reported by the first-healthy endpoint.
    pub async fn chain_id(&self) -> Result<u64, TransportError> {
        self.call(|provider| async move { provider.get_chain_id().await }).await
    }

    /// Fetches a block header by number, without its transaction bodies.
    pub async fn fetch_block_header(&self, number: u64) -> Result<Header, TransportError> {
        let block = self
            .call(move |provider| async move {
                let block = provider.get_block_by_number(BlockNumberOrTag::Number(number)).await?;
                block.ok_or_else(|| block_not_found(number))
            })
            .await?;
        Ok(block.header)
    }

    /// Fetches a full block, including transaction bodies, by number.
    pub async fn fetch_block_with_transactions(&self, number: u64) -> Result<Block, TransportError> {
        self.call(move |provider| async move {
            let block =
                provider.get_block_by_number(BlockNumberOrTag::Number(number)).full().await?;
            block.ok_or_else(|| block_not_found(number))
        })
        .await
    }

    /// Retries `op` against the first-healthy endpoint, re-reading the
    /// health snapshot on every attempt so a recovering endpoint is picked
    /// up mid-retry rather than only on the next foreground call.
    async fn call<T, F, Fut>(&self, op: F) -> Result<T, TransportError>
    where
        F: Fn(RootProvider) -> Fut + Send + Sync,
        Fut: std::future::Future<Output = Result<T, alloy_transport::TransportError>> + Send,
        T: Send,
    {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(RETRY_BASE_DELAY)
            .with_factor(2.0)
            .with_max_times(self.max_retries as usize);

        (|| async { op(self.route().await).await })
            .retry(backoff)
            .notify(|err: &alloy_transport::TransportError, dur: Duration| {
                tracing::warn!(error = %err, retry_in = ?dur, "transient RPC error, retrying");
            })
            .await
            .map_err(TransportError::transient)
    }

    /// Returns the first-healthy provider in priority order, falling back to
    /// the first configured endpoint (index 0) if none are healthy.
    async fn route(&self) -> RootProvider {
        let snapshot = self.health.snapshot().await;
        for (index, entry) in snapshot.iter().enumerate() {
            if entry.healthy {
                return self.providers[index].clone();
            }
        }
        tracing::warn!("no healthy endpoints, falling back to the first configured endpoint");
        self.providers[0].clone()
    }
}

fn block_not_found(number: u64) -> alloy_transport::TransportError {
    alloy_transport::TransportErrorKind::custom_str(&format!("block {number} not found"))
}
