//! The long-running wrapper around [`crate::iteration::run_iteration`]:
//! sleep/backoff policy and graceful shutdown.
//!
//! Grounded on the node's actor-cancellation pattern: shutdown is a
//! [`CancellationToken`], checked between iterations and raced against the
//! `AtHead`/backoff sleep, never injected mid-iteration — a commit is
//! always let to finish or roll back on its own.

use std::sync::Arc;

use indexer_persistence::PersistenceLayer;
use indexer_transport::BlockSource;
use tokio_util::sync::CancellationToken;

use crate::config::IngestionConfig;
use crate::iteration::{IterationOutcome, run_iteration};

/// Runs the ingestion loop until `cancellation` fires or a fatal error
/// halts it.
pub async fn run(
    source: Arc<dyn BlockSource>,
    persistence: Arc<dyn PersistenceLayer>,
    config: IngestionConfig,
    cancellation: CancellationToken,
) {
    loop {
        if cancellation.is_cancelled() {
            break;
        }

        match run_iteration(source.as_ref(), persistence.as_ref()).await {
            Ok(IterationOutcome::AtHead) => {
                tokio::select! {
                    () = tokio::time::sleep(config.poll_interval) => {}
                    () = cancellation.cancelled() => break,
                }
            }
            Ok(IterationOutcome::Committed | IterationOutcome::Reorganized) => {
                // Keep iterating immediately: there may be more blocks to
                // catch up on, or another reorg step to walk back.
            }
            Err(error) if error.is_fatal() => {
                tracing::error!(%error, "fatal ingestion error, halting");
                break;
            }
            Err(error) => {
                tracing::warn!(%error, "ingestion iteration failed, backing off");
                tokio::select! {
                    () = tokio::time::sleep(config.error_backoff) => {}
                    () = cancellation.cancelled() => break,
                }
            }
        }
    }
    tracing::info!("ingestion loop stopped");
}
