//! Errors a backfill run can fail with.

use indexer_persistence::PersistenceError;
use indexer_transport::TransportError;
use thiserror::Error;

/// Failure reasons for [`crate::backfill`]. Any of these aborts the run —
/// the operator re-runs, and idempotence guarantees no duplication.
#[derive(Debug, Error)]
pub enum BackfillError {
    /// A block fetch exhausted its retries.
    #[error("failed to fetch block {block_number}: {source}")]
    Fetch { block_number: u64, #[source] source: TransportError },

    /// The store rejected the batch commit for a range.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// `start > end`, violating the driver's precondition.
    #[error("backfill range is invalid: start {start} > end {end}")]
    InvalidRange { start: u64, end: u64 },
}
