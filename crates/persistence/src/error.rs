//! The persistence layer's error taxonomy.

use thiserror::Error;

/// Everything that can go wrong talking to the store.
///
/// [`PersistenceError::is_fatal`] distinguishes failures a caller may retry
/// from ones that must stop the process: a failed `rollback_to` leaves the
/// checkpoint and the transaction table in a state neither caller (the
/// ingestion loop or the maintenance CLI) can safely reason about, so it is
/// always fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Could not obtain a connection from the pool.
    #[error("failed to obtain a database connection: {0}")]
    Connection(#[from] bb8::RunError<diesel_async::pooled_connection::PoolError>),

    /// A query failed. Covers both `SELECT`s and the non-rollback halves of
    /// `append_batch`/`bulk_ingest`.
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// `rollback_to` failed partway through. Fatal: the caller must not
    /// treat the store as consistent afterward.
    #[error("rollback to block {target_block} failed: {source}")]
    Rollback { target_block: u64, #[source] source: diesel::result::Error },

    /// A stored column could not be parsed back into its typed form.
    #[error("corrupt row: {detail}")]
    CorruptRow { detail: String },

    /// The configured database URL or pool settings were invalid.
    #[error("invalid persistence configuration: {0}")]
    Config(String),
}

impl PersistenceError {
    /// Whether this error represents unrecoverable store corruption that the
    /// caller must treat as fatal rather than retry.
    ///
    /// Only a failed rollback and a corrupt row meet that bar: a connection
    /// timeout or a transient query error can be retried by the caller's own
    /// backoff loop without the store itself being in an unknown state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Rollback { .. } | Self::CorruptRow { .. })
    }
}
