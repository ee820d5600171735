//! The narrow surface the ingestion loop and backfill driver depend on,
//! split out as a trait so tests can substitute a fake without standing up
//! a real RPC endpoint.

use alloy_rpc_types_eth::{Block, Header};
use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::Transport;

/// The four calls spec.md's RPC Transport contract names.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Current chain head block number.
    async fn current_head(&self) -> Result<u64, TransportError>;
    /// Header of block `number`, without transaction bodies.
    async fn fetch_block_header(&self, number: u64) -> Result<Header, TransportError>;
    /// Full block, including transaction bodies, at `number`.
    async fn fetch_block_with_transactions(&self, number: u64) -> Result<Block, TransportError>;
}

#[async_trait]
impl BlockSource for Transport {
    async fn current_head(&self) -> Result<u64, TransportError> {
        Transport::current_head(self).await
    }

    async fn fetch_block_header(&self, number: u64) -> Result<Header, TransportError> {
        Transport::fetch_block_header(self, number).await
    }

    async fn fetch_block_with_transactions(&self, number: u64) -> Result<Block, TransportError> {
        Transport::fetch_block_with_transactions(self, number).await
    }
}
