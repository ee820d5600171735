//! The single-row checkpoint that is the sole source of truth for resume position.

use alloy_primitives::B256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The constant row id the checkpoint store keys its one row on.
pub const CHECKPOINT_ID: &str = "chain_head";

/// Durable cursor `(block_number, block_hash)` marking the last committed head.
///
/// The checkpoint is created lazily on first commit and updated transactionally
/// with every `append_batch`, `bulk_ingest`, or `rollback_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The last block number known to be fully committed.
    pub block_number: u64,
    /// The canonical hash of `block_number`, as known at commit time.
    ///
    /// `None` after a maintenance rollback that intentionally leaves the hash
    /// unset (see the persistence layer's `rollback_to` documentation) until
    /// the daemon re-verifies and advances past it.
    pub block_hash: Option<B256>,
    /// When this row was last written.
    pub last_updated: DateTime<Utc>,
}

impl Checkpoint {
    /// Builds a checkpoint with a known hash, timestamped `now`.
    pub fn new(block_number: u64, block_hash: B256) -> Self {
        Self { block_number, block_hash: Some(block_hash), last_updated: Utc::now() }
    }
}
