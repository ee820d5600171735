//! The one error family specific to this binary: the `rollback`
//! subcommand's own precondition checks, kept distinct from
//! `indexer_persistence::PersistenceError` since failing a precondition
//! never touches the store.

use thiserror::Error;

/// A `rollback` precondition that failed before any write was attempted.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// No checkpoint row exists yet; there is nothing to roll back.
    #[error("no checkpoint exists yet, nothing to roll back")]
    NoCheckpoint,
    /// The requested target is ahead of the current checkpoint.
    #[error("rollback target {target} is ahead of the current checkpoint {current_head}")]
    TargetAheadOfHead { target: u64, current_head: u64 },
}
