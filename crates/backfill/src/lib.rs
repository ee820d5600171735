//! Parallel range fetch and batched idempotent historical backfill.

mod driver;
mod error;

pub use driver::{DEFAULT_BATCH_BLOCKS, backfill};
pub use error::BackfillError;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use alloy_primitives::B256;
    use alloy_rpc_types_eth::Block;
    use async_trait::async_trait;
    use indexer_persistence::{PersistenceError, PersistenceLayer};
    use indexer_transport::{BlockSource, TransportError};
    use indexer_types::{Checkpoint, TransactionRecord};

    use super::*;

    #[derive(Default)]
    struct FakeSource {
        blocks: HashMap<u64, Block>,
    }

    #[async_trait]
    impl BlockSource for FakeSource {
        async fn current_head(&self) -> Result<u64, TransportError> {
            Ok(self.blocks.keys().copied().max().unwrap_or(0))
        }

        async fn fetch_block_header(
            &self,
            number: u64,
        ) -> Result<alloy_rpc_types_eth::Header, TransportError> {
            self.blocks
                .get(&number)
                .map(|b| b.header.clone())
                .ok_or_else(|| TransportError::Fatal(format!("no block {number}")))
        }

        async fn fetch_block_with_transactions(&self, number: u64) -> Result<Block, TransportError> {
            self.blocks
                .get(&number)
                .cloned()
                .ok_or_else(|| TransportError::Fatal(format!("no block {number}")))
        }
    }

    #[derive(Default)]
    struct FakeStore {
        checkpoint: Mutex<Option<Checkpoint>>,
        committed: Mutex<Vec<TransactionRecord>>,
    }

    #[async_trait]
    impl PersistenceLayer for FakeStore {
        async fn append_batch(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
            self.bulk_ingest(records).await
        }

        async fn bulk_ingest(&self, records: &[TransactionRecord]) -> Result<(), PersistenceError> {
            if records.is_empty() {
                return Ok(());
            }
            let tail = records.iter().max_by_key(|r| r.block_number).unwrap();
            *self.checkpoint.lock().unwrap() = Some(Checkpoint::new(tail.block_number, tail.block_hash));
            self.committed.lock().unwrap().extend(records.iter().cloned());
            Ok(())
        }

        async fn rollback_to(&self, _n: u64, _new_head_hash: Option<B256>) -> Result<(), PersistenceError> {
            unimplemented!("not exercised by backfill tests")
        }

        async fn current_checkpoint(&self) -> Result<Option<Checkpoint>, PersistenceError> {
            Ok(*self.checkpoint.lock().unwrap())
        }

        async fn advance_checkpoint(&self, block_number: u64, block_hash: B256) -> Result<(), PersistenceError> {
            *self.checkpoint.lock().unwrap() = Some(Checkpoint::new(block_number, block_hash));
            Ok(())
        }
    }

    fn empty_block(number: u64) -> Block {
        let mut inner = alloy_consensus::Header::default();
        inner.number = number;
        let header = alloy_rpc_types_eth::Header {
            hash: B256::repeat_byte(number as u8),
            inner,
            total_difficulty: None,
            size: None,
        };
        Block { header, uncles: Vec::new(), transactions: Default::default(), withdrawals: None }
    }

    #[tokio::test]
    async fn rejects_inverted_range() {
        let source = FakeSource::default();
        let store = FakeStore::default();
        let err = backfill(&source, &store, 10, 5, 10).await.unwrap_err();
        assert!(matches!(err, BackfillError::InvalidRange { start: 10, end: 5 }));
    }

    #[tokio::test]
    async fn advances_checkpoint_across_empty_range() {
        let blocks = (50..=60).map(|n| (n, empty_block(n))).collect();
        let source = FakeSource { blocks };
        let store = FakeStore::default();

        backfill(&source, &store, 50, 60, 5).await.unwrap();

        let checkpoint = store.current_checkpoint().await.unwrap().unwrap();
        assert_eq!(checkpoint.block_number, 60);
    }

    #[tokio::test]
    async fn aborts_on_missing_block() {
        let blocks = (50..=55).map(|n| (n, empty_block(n))).collect();
        let source = FakeSource { blocks };
        let store = FakeStore::default();

        let err = backfill(&source, &store, 50, 60, 5).await.unwrap_err();
        assert!(matches!(err, BackfillError::Fetch { .. }));
    }
}
