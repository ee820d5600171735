//! The store's public contract and its Postgres implementation.
//!
//! Shaped after the hexagonal "ports" style: [`PersistenceLayer`] is the
//! port, [`PostgresPersistence`] is the one adapter this workspace ships.
//! Swapping backends, or mocking the store in a test, means implementing
//! this trait rather than threading a connection pool through call sites.

use alloy_primitives::B256;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel::sql_query;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use indexer_types::{CHECKPOINT_ID, Checkpoint, TransactionRecord};

use crate::config::PersistenceConfig;
use crate::error::PersistenceError;
use crate::models::{CheckpointRow, NewTransaction, StagedTransaction};
use crate::schema::{checkpoint, transactions, transactions_staging};

/// Multi-row `INSERT ... ON CONFLICT DO NOTHING` chunk size used by both
/// the staging load in [`PostgresPersistence::bulk_ingest`] and any future
/// caller that wants to stay well under Postgres's per-statement bind-param
/// ceiling.
const INSERT_CHUNK_SIZE: usize = 1_000;

/// The store's contract, independent of backend.
///
/// # Errors
///
/// Every method returns [`PersistenceError`]. Callers must check
/// [`PersistenceError::is_fatal`] on failures from `rollback_to`: a failed
/// rollback leaves the store's consistency unknown and must not be retried
/// silently.
#[async_trait]
pub trait PersistenceLayer: Send + Sync {
    /// Appends a small, real-time batch and advances the checkpoint to its
    /// tail. Idempotent: re-appending an already-stored transaction is a
    /// no-op for that row.
    async fn append_batch(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError>;

    /// Loads a large backfill batch via a staging table, idempotent the same
    /// way as `append_batch` but optimized for bulk volume.
    async fn bulk_ingest(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError>;

    /// Deletes every transaction with `block_number >= n` and rewinds the
    /// checkpoint to `n - 1`, atomically. `new_head_hash` is the hash to
    /// store for `n - 1`; pass `None` to leave the stored hash untouched
    /// (the ingestion loop's own lineage check is the correctness backstop
    /// in that case, not this call).
    ///
    /// Failure here is always fatal: see [`PersistenceError::is_fatal`].
    async fn rollback_to(&self, n: u64, new_head_hash: Option<B256>) -> Result<(), PersistenceError>;

    /// Reads the current checkpoint, or `None` if the store has never
    /// committed anything.
    async fn current_checkpoint(&self) -> Result<Option<Checkpoint>, PersistenceError>;

    /// Advances the checkpoint to `(block_number, block_hash)` without
    /// touching the transactions table.
    ///
    /// Used for empty blocks: `append_batch`/`bulk_ingest` only move the
    /// checkpoint as a side effect of persisting at least one row, so an
    /// empty block needs this to keep progress monotonic across it.
    async fn advance_checkpoint(
        &self,
        block_number: u64,
        block_hash: B256,
    ) -> Result<(), PersistenceError>;
}

/// The one store adapter this workspace ships: a pooled, transactional
/// Postgres backend.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: Pool<AsyncPgConnection>,
}

impl PostgresPersistence {
    /// Builds a connection pool from `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Config`] if the pool cannot be built.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self, PersistenceError> {
        let pool = crate::pool::build_pool(config).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PersistenceLayer for PostgresPersistence {
    async fn append_batch(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
        if records.is_empty() {
            return Ok(());
        }
        let tail = tail_checkpoint(records);
        let rows: Vec<NewTransaction> = records.iter().map(NewTransaction::from).collect();

        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    diesel::insert_into(transactions::table)
                        .values(chunk)
                        .on_conflict((transactions::transaction_hash, transactions::block_number))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                upsert_checkpoint(conn, tail.0, tail.1).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(PersistenceError::from)
    }

    async fn bulk_ingest(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
        if records.is_empty() {
            return Ok(());
        }
        let tail = tail_checkpoint(records);
        let staged: Vec<StagedTransaction> = records.iter().map(StagedTransaction::from).collect();

        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                sql_query(
                    "CREATE TEMP TABLE transactions_staging \
                     (LIKE transactions INCLUDING DEFAULTS) ON COMMIT DROP",
                )
                .execute(conn)
                .await?;

                for chunk in staged.chunks(INSERT_CHUNK_SIZE) {
                    diesel::insert_into(transactions_staging::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }

                sql_query(
                    "INSERT INTO transactions \
                     SELECT * FROM transactions_staging \
                     ON CONFLICT (transaction_hash, block_number) DO NOTHING",
                )
                .execute(conn)
                .await?;

                upsert_checkpoint(conn, tail.0, tail.1).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(PersistenceError::from)
    }

    async fn rollback_to(&self, n: u64, new_head_hash: Option<B256>) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted_from = n as i64;
        let new_head = n.saturating_sub(1);
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(transactions::table)
                    .filter(transactions::block_number.ge(deleted_from))
                    .execute(conn)
                    .await?;

                if let Some(hash) = new_head_hash {
                    upsert_checkpoint(conn, new_head, Some(hash)).await?;
                } else {
                    advance_checkpoint_number_only(conn, new_head).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|source| PersistenceError::Rollback { target_block: n, source })
    }

    async fn current_checkpoint(&self) -> Result<Option<Checkpoint>, PersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = checkpoint::table
            .filter(checkpoint::id.eq(CHECKPOINT_ID))
            .first::<CheckpointRow>(&mut conn)
            .await
            .optional()?;
        row.map(Checkpoint::try_from).transpose()
    }

    async fn advance_checkpoint(
        &self,
        block_number: u64,
        block_hash: B256,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await?;
        upsert_checkpoint(&mut conn, block_number, Some(block_hash)).await?;
        Ok(())
    }
}

/// The `(block_number, block_hash)` to advance the checkpoint to after
/// committing `records`: the tail of the batch, since both `append_batch`
/// and `bulk_ingest` receive records in ascending `(block_number,
/// transaction_index)` order from their callers.
fn tail_checkpoint(records: &[TransactionRecord]) -> (u64, B256) {
    let tail = records.iter().max_by_key(|r| (r.block_number, r.transaction_index)).expect(
        "tail_checkpoint is only called with a non-empty slice, checked by the caller",
    );
    (tail.block_number, tail.block_hash)
}

async fn upsert_checkpoint(
    conn: &mut AsyncPgConnection,
    block_number: u64,
    block_hash: Option<B256>,
) -> Result<(), diesel::result::Error> {
    let row = CheckpointRow::new(block_number, block_hash);
    diesel::insert_into(checkpoint::table)
        .values(&row)
        .on_conflict(checkpoint::id)
        .do_update()
        .set(&row)
        .execute(conn)
        .await?;
    Ok(())
}

/// Rewinds the checkpoint's block number without touching its stored hash,
/// used by `rollback_to` when the caller passes `new_head_hash: None`.
async fn advance_checkpoint_number_only(
    conn: &mut AsyncPgConnection,
    block_number: u64,
) -> Result<(), diesel::result::Error> {
    let existing = checkpoint::table
        .filter(checkpoint::id.eq(CHECKPOINT_ID))
        .select(checkpoint::block_hash)
        .first::<Option<String>>(conn)
        .await
        .optional()?
        .flatten();

    diesel::insert_into(checkpoint::table)
        .values(CheckpointRow {
            id: CHECKPOINT_ID.to_string(),
            block_number: block_number as i64,
            block_hash: existing,
            last_updated: chrono::Utc::now(),
        })
        .on_conflict(checkpoint::id)
        .do_update()
        .set((
            checkpoint::block_number.eq(block_number as i64),
            checkpoint::last_updated.eq(chrono::Utc::now()),
        ))
        .execute(conn)
        .await?;
    Ok(())
}
