//! The re-org-safe ingestion state machine that drives forward progress.
//!
//! [`run`] is the long-running entry point a daemon binary spawns;
//! [`run_iteration`] is the single-pass state machine it wraps, exposed
//! separately so tests can drive one step at a time.

mod config;
mod error;
mod iteration;
mod runner;
mod state;

pub use config::IngestionConfig;
pub use error::IterationError;
pub use iteration::{IterationOutcome, run_iteration};
pub use runner::run;
pub use state::State;

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy_primitives::B256;
    use alloy_rpc_types_eth::{Block, Header};
    use async_trait::async_trait;
    use indexer_persistence::{PersistenceError, PersistenceLayer};
    use indexer_transport::{BlockSource, TransportError};
    use indexer_types::{Checkpoint, TransactionRecord};

    use super::*;

    /// A scripted [`BlockSource`]: headers and blocks are pre-seeded by
    /// block number, `current_head` is fixed per test.
    #[derive(Default)]
    struct FakeSource {
        head: u64,
        headers: Mutex<std::collections::HashMap<u64, Header>>,
        blocks: Mutex<std::collections::HashMap<u64, Block>>,
    }

    #[async_trait]
    impl BlockSource for FakeSource {
        async fn current_head(&self) -> Result<u64, TransportError> {
            Ok(self.head)
        }

        async fn fetch_block_header(&self, number: u64) -> Result<Header, TransportError> {
            self.headers
                .lock()
                .unwrap()
                .get(&number)
                .cloned()
                .ok_or_else(|| TransportError::Fatal(format!("no header seeded for {number}")))
        }

        async fn fetch_block_with_transactions(&self, number: u64) -> Result<Block, TransportError> {
            self.blocks
                .lock()
                .unwrap()
                .get(&number)
                .cloned()
                .ok_or_else(|| TransportError::Fatal(format!("no block seeded for {number}")))
        }
    }

    /// An in-memory [`PersistenceLayer`] double, good enough to exercise the
    /// state machine's checkpoint and rollback transitions without a
    /// database.
    #[derive(Default)]
    struct FakeStore {
        checkpoint: Mutex<Option<Checkpoint>>,
        rows: Mutex<Vec<TransactionRecord>>,
    }

    #[async_trait]
    impl PersistenceLayer for FakeStore {
        async fn append_batch(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
            if records.is_empty() {
                return Ok(());
            }
            let tail = records.iter().max_by_key(|r| r.block_number).unwrap();
            *self.checkpoint.lock().unwrap() = Some(Checkpoint::new(tail.block_number, tail.block_hash));
            self.rows.lock().unwrap().extend(records.iter().cloned());
            Ok(())
        }

        async fn bulk_ingest(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
            self.append_batch(records).await
        }

        async fn rollback_to(&self, n: u64, new_head_hash: Option<B256>) -> Result<(), PersistenceError> {
            self.rows.lock().unwrap().retain(|r| r.block_number < n);
            let new_head = n.saturating_sub(1);
            let mut checkpoint = self.checkpoint.lock().unwrap();
            *checkpoint = Some(match new_head_hash {
                Some(hash) => Checkpoint::new(new_head, hash),
                None => Checkpoint {
                    block_number: new_head,
                    block_hash: None,
                    last_updated: checkpoint.as_ref().map(|c| c.last_updated).unwrap_or_default(),
                },
            });
            Ok(())
        }

        async fn current_checkpoint(&self) -> Result<Option<Checkpoint>, PersistenceError> {
            Ok(*self.checkpoint.lock().unwrap())
        }

        async fn advance_checkpoint(&self, block_number: u64, block_hash: B256) -> Result<(), PersistenceError> {
            *self.checkpoint.lock().unwrap() = Some(Checkpoint::new(block_number, block_hash));
            Ok(())
        }
    }

    fn header(number: u64, hash: B256, parent_hash: B256) -> Header {
        let mut inner = alloy_consensus::Header::default();
        inner.number = number;
        inner.parent_hash = parent_hash;
        Header { hash, inner, total_difficulty: None, size: None }
    }

    fn empty_block(number: u64, hash: B256, parent_hash: B256) -> Block {
        Block { header: header(number, hash, parent_hash), uncles: Vec::new(), transactions: Default::default(), withdrawals: None }
    }

    #[tokio::test]
    async fn bootstraps_from_chain_head_on_empty_store() {
        let hash100 = B256::repeat_byte(0xAA);
        let source = FakeSource {
            head: 100,
            blocks: Mutex::new(std::collections::HashMap::from([(
                100,
                empty_block(100, hash100, B256::ZERO),
            )])),
            ..Default::default()
        };
        let store = FakeStore::default();

        let outcome = run_iteration(&source, &store).await.unwrap();
        assert_eq!(outcome, IterationOutcome::Committed);
        let checkpoint = store.current_checkpoint().await.unwrap().unwrap();
        assert_eq!(checkpoint.block_number, 100);
        assert_eq!(checkpoint.block_hash, Some(hash100));
    }

    #[tokio::test]
    async fn at_head_when_target_exceeds_chain_head() {
        let hash100 = B256::repeat_byte(0xAA);
        let source = FakeSource { head: 100, ..Default::default() };
        let store = FakeStore::default();
        store.advance_checkpoint(100, hash100).await.unwrap();

        let outcome = run_iteration(&source, &store).await.unwrap();
        assert_eq!(outcome, IterationOutcome::AtHead);
    }

    #[tokio::test]
    async fn matching_lineage_syncs_forward() {
        let hash100 = B256::repeat_byte(0xAA);
        let hash101 = B256::repeat_byte(0xBB);
        let source = FakeSource {
            head: 101,
            headers: Mutex::new(std::collections::HashMap::from([(
                101,
                header(101, hash101, hash100),
            )])),
            blocks: Mutex::new(std::collections::HashMap::from([(
                101,
                empty_block(101, hash101, hash100),
            )])),
        };
        let store = FakeStore::default();
        store.advance_checkpoint(100, hash100).await.unwrap();

        let outcome = run_iteration(&source, &store).await.unwrap();
        assert_eq!(outcome, IterationOutcome::Committed);
        assert_eq!(store.current_checkpoint().await.unwrap().unwrap().block_number, 101);
    }

    #[tokio::test]
    async fn mismatched_lineage_triggers_one_block_rollback() {
        let hash_a = B256::repeat_byte(0xAA);
        let hash_b = B256::repeat_byte(0xBB);
        let wrong_parent = B256::repeat_byte(0xFF);
        let source = FakeSource {
            head: 101,
            headers: Mutex::new(std::collections::HashMap::from([(
                101,
                header(101, hash_b, wrong_parent),
            )])),
            ..Default::default()
        };
        let store = FakeStore::default();
        store.advance_checkpoint(100, hash_a).await.unwrap();

        let outcome = run_iteration(&source, &store).await.unwrap();
        assert_eq!(outcome, IterationOutcome::Reorganized);
        let checkpoint = store.current_checkpoint().await.unwrap().unwrap();
        assert_eq!(checkpoint.block_number, 99);
    }

    #[tokio::test]
    async fn bare_checkpoint_hash_is_trusted_and_resumes_forward() {
        let hash101 = B256::repeat_byte(0xBB);
        let source = FakeSource {
            head: 101,
            headers: Mutex::new(std::collections::HashMap::from([(
                101,
                header(101, hash101, B256::repeat_byte(0x11)),
            )])),
            blocks: Mutex::new(std::collections::HashMap::from([(
                101,
                empty_block(101, hash101, B256::repeat_byte(0x11)),
            )])),
        };
        let store = FakeStore::default();
        *store.checkpoint.lock().unwrap() =
            Some(Checkpoint { block_number: 100, block_hash: None, last_updated: chrono::Utc::now() });

        let outcome = run_iteration(&source, &store).await.unwrap();
        assert_eq!(outcome, IterationOutcome::Committed);
    }
}
