//! Errors an ingestion iteration can fail with.
//!
//! Reorg is deliberately absent: a parent-hash mismatch is not an error,
//! it's the signal that drives the `Reorganizing` branch. See
//! [`crate::run_iteration`].

use indexer_persistence::PersistenceError;
use indexer_transport::TransportError;
use thiserror::Error;

/// Everything one iteration of the ingestion loop can fail with.
#[derive(Debug, Error)]
pub enum IterationError {
    /// The transport exhausted its retries for this call.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The store rejected a read or write.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl IterationError {
    /// Whether this iteration's failure leaves the store in a state the
    /// daemon cannot safely continue from. Only a failed rollback meets
    /// that bar; every other failure is caught by the loop boundary, logged,
    /// and retried after the configured backoff.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Persistence(e) if e.is_fatal())
    }
}
