//! The parallel range-fetch, batched-commit backfill driver.

use futures::future::join_all;
use indexer_persistence::PersistenceLayer;
use indexer_transport::{BlockSource, block_to_raw_transactions};
use indexer_validator::validate_batch;

use crate::error::BackfillError;

/// Default `batch_blocks` when the caller doesn't specify one, per the
/// maintenance CLI's `backfill` subcommand.
pub const DEFAULT_BATCH_BLOCKS: u64 = 10;

/// Fetches and commits `[start, end]` inclusive, `batch_blocks` blocks at a
/// time: each range is fetched in parallel, then committed as one
/// `bulk_ingest` call before advancing to the next range.
///
/// Any block fetch failure after the transport's own retries aborts the
/// whole run; re-running is safe because `bulk_ingest` is idempotent.
pub async fn backfill(
    source: &dyn BlockSource,
    persistence: &dyn PersistenceLayer,
    start: u64,
    end: u64,
    batch_blocks: u64,
) -> Result<(), BackfillError> {
    if start > end {
        return Err(BackfillError::InvalidRange { start, end });
    }
    let total_blocks = end - start + 1;
    let mut cur = start;

    while cur <= end {
        let range_end = (cur + batch_blocks - 1).min(end);
        let numbers: Vec<u64> = (cur..=range_end).collect();

        let fetches = join_all(numbers.iter().map(|&n| source.fetch_block_with_transactions(n)));
        let results = fetches.await;

        let mut raws = Vec::new();
        let mut last_block_hash = None;
        for (number, result) in numbers.iter().zip(results) {
            let block = result
                .map_err(|source| BackfillError::Fetch { block_number: *number, source })?;
            last_block_hash = Some(block.header.hash);
            raws.extend(block_to_raw_transactions(&block));
        }

        let (records, failures) = validate_batch(&raws);
        for failure in &failures {
            tracing::warn!(block_number = failure.block_number, reason = %failure.reason, "dropped invalid transaction during backfill");
        }

        if records.is_empty() {
            if let Some(hash) = last_block_hash {
                persistence.advance_checkpoint(range_end, hash).await?;
            }
        } else {
            persistence.bulk_ingest(&records).await?;
        }

        let done = range_end - start + 1;
        let pct_complete = done as f64 / total_blocks as f64 * 100.0;
        tracing::info!(
            from = cur,
            to = range_end,
            tx_count = records.len(),
            pct_complete,
            "backfill progress"
        );

        cur = range_end + 1;
    }

    Ok(())
}
