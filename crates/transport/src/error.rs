//! The transport's error taxonomy.

use thiserror::Error;

/// Everything [`crate::Transport`] can fail with.
///
/// The split matters to the ingestion loop: [`TransportError::Transient`]
/// means retry already happened inside the transport and was exhausted for
/// this call, so the loop's own iteration-level backoff takes over.
/// [`TransportError::Fatal`] means the transport is unusable regardless of
/// retrying (e.g. misconfiguration).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Every retry attempt for this call failed.
    #[error("RPC call failed after retrying: {source}")]
    Transient {
        #[source]
        source: alloy_transport::TransportError,
    },

    /// The transport cannot serve any call regardless of retrying.
    #[error("fatal transport error: {0}")]
    Fatal(String),
}

impl TransportError {
    pub(crate) fn transient(source: alloy_transport::TransportError) -> Self {
        Self::Transient { source }
    }
}
