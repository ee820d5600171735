//! Converting an RPC block into the validator's wire shape.
//!
//! Lives next to [`crate::source::BlockSource`] rather than in the
//! ingestion or backfill crates: both of those consume fetched blocks the
//! same way, and neither should depend on the other to share this.

use alloy_consensus::Transaction as _;
use alloy_rpc_types_eth::Block;
use indexer_types::RawTransaction;

/// Flattens a fetched block's transactions into [`RawTransaction`]s for
/// [`indexer_validator::validate_batch`].
///
/// Block-level metadata (`block_number`, `block_hash`) is taken from the
/// block itself rather than trusted per-transaction fields, since a
/// transaction fetched via `eth_getBlockByNumber` always belongs to the
/// block it was returned in.
pub fn block_to_raw_transactions(block: &Block) -> Vec<RawTransaction> {
    let block_number = block.header.number;
    let block_hash = block.header.hash;
    block
        .transactions
        .txns()
        .enumerate()
        .map(|(index, tx)| RawTransaction {
            block_number: block_number as i64,
            block_hash: hex(block_hash),
            transaction_hash: hex(tx.inner.tx_hash()),
            transaction_index: index as i64,
            from_address: hex(tx.inner.signer()),
            to_address: tx.to().map(hex),
            amount: tx.value().to_string(),
            is_internal_call: None,
        })
        .collect()
}

fn hex(value: impl AsRef<[u8]>) -> String {
    alloy_primitives::hex::encode_prefixed(value.as_ref())
}
