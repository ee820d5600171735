//! One pass of the ingestion loop: the five-step state machine from the
//! component design, independent of the sleep/cancellation wrapper around
//! it in [`crate::run`].

use indexer_persistence::PersistenceLayer;
use indexer_transport::{BlockSource, block_to_raw_transactions};
use indexer_validator::validate_batch;

use crate::error::IterationError;
use crate::state::State;

/// What happened during one iteration, for the caller's logging/backoff
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Already caught up to the chain head; nothing to do this iteration.
    AtHead,
    /// A block (possibly empty) was committed and the checkpoint advanced.
    Committed,
    /// Lineage mismatched; the checkpoint was rolled back one block.
    Reorganized,
}

/// Runs one iteration of the state machine described in the component
/// design: read state, bootstrap or check lineage, sync or roll back.
pub async fn run_iteration(
    source: &dyn BlockSource,
    persistence: &dyn PersistenceLayer,
) -> Result<IterationOutcome, IterationError> {
    let db_head = persistence.current_checkpoint().await?;
    let chain_head = source.current_head().await?;

    let Some(db_head) = db_head else {
        tracing::info!(chain_head, state = %State::Bootstrapping, "no checkpoint, bootstrapping from chain head");
        return commit_block(source, persistence, chain_head).await;
    };

    let target = db_head.block_number + 1;
    if target > chain_head {
        tracing::debug!(
            db_head = db_head.block_number,
            chain_head,
            state = %State::AtHead,
            "caught up to chain head"
        );
        return Ok(IterationOutcome::AtHead);
    }

    let header = source.fetch_block_header(target).await?;
    let lineage_matches = match db_head.block_hash {
        Some(expected_parent) => header.parent_hash == expected_parent,
        // No stored hash (checkpoint left bare by a maintenance rollback):
        // trust the chain and resume forward; there is nothing to compare
        // against until the next commit re-establishes one.
        None => true,
    };

    if lineage_matches {
        tracing::info!(block_number = target, state = %State::Syncing, "lineage verified");
        commit_block(source, persistence, target).await
    } else {
        tracing::warn!(
            db_head = db_head.block_number,
            state = %State::Reorganizing,
            "parent hash mismatch, rolling back one block"
        );
        metrics::counter!("reorgs_detected_total").increment(1);
        persistence.rollback_to(db_head.block_number, None).await?;
        Ok(IterationOutcome::Reorganized)
    }
}

/// Fetches, validates, and commits block `number`, including the empty
/// block case where the checkpoint still has to advance.
async fn commit_block(
    source: &dyn BlockSource,
    persistence: &dyn PersistenceLayer,
    number: u64,
) -> Result<IterationOutcome, IterationError> {
    let block = source.fetch_block_with_transactions(number).await?;
    let block_hash = block.header.hash;
    let block_timestamp = block.header.timestamp;
    let raws = block_to_raw_transactions(&block);

    if raws.is_empty() {
        persistence.advance_checkpoint(number, block_hash).await?;
        tracing::info!(block_number = number, tx_count = 0, "committed empty block");
        record_progress(number, block_timestamp);
        return Ok(IterationOutcome::Committed);
    }

    let (records, failures) = validate_batch(&raws);
    for failure in &failures {
        tracing::warn!(block_number = failure.block_number, reason = %failure.reason, "dropped invalid transaction");
    }

    if records.is_empty() {
        // Every transaction in the block failed validation; still advance
        // so progress stays monotonic (invariant I3).
        persistence.advance_checkpoint(number, block_hash).await?;
    } else {
        persistence.append_batch(&records).await?;
    }

    tracing::info!(block_number = number, tx_count = records.len(), "committed block");
    record_progress(number, block_timestamp);
    Ok(IterationOutcome::Committed)
}

/// Updates the two forward-progress gauges after a successful commit:
/// `latest_indexed_block_number` and the wall-clock gap between a block's
/// own timestamp and the moment it finished committing.
fn record_progress(block_number: u64, block_timestamp: u64) {
    metrics::gauge!("latest_indexed_block_number").set(block_number as f64);
    let now = chrono::Utc::now().timestamp();
    let latency = (now - block_timestamp as i64).max(0) as f64;
    metrics::gauge!("indexing_latency_seconds").set(latency);
}
