//! Row shapes mapping between [`indexer_types`] and the diesel schema.
//!
//! Hashes and addresses are stored as `0x`-prefixed lowercase hex text rather
//! than `bytea`: it keeps the schema readable from `psql` during an incident
//! and sidesteps endianness questions in index range scans, at the cost of a
//! few bytes per row.

use alloy_primitives::B256;
#[cfg(test)]
use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use indexer_types::{CHECKPOINT_ID, Checkpoint, TransactionRecord};

use crate::schema::{checkpoint, transactions, transactions_staging};

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransaction {
    pub block_number: i64,
    pub block_hash: String,
    pub transaction_hash: String,
    pub transaction_index: i32,
    pub from_address: String,
    pub to_address: Option<String>,
    pub amount: BigDecimal,
    pub is_internal_call: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions_staging)]
pub(crate) struct StagedTransaction {
    pub block_number: i64,
    pub block_hash: String,
    pub transaction_hash: String,
    pub transaction_index: i32,
    pub from_address: String,
    pub to_address: Option<String>,
    pub amount: BigDecimal,
    pub is_internal_call: bool,
}

impl From<&TransactionRecord> for NewTransaction {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            block_number: record.block_number as i64,
            block_hash: hex_of(record.block_hash.as_slice()),
            transaction_hash: hex_of(record.transaction_hash.as_slice()),
            transaction_index: record.transaction_index as i32,
            from_address: hex_of(record.from_address.as_slice()),
            to_address: record.to_address.as_ref().map(|addr| hex_of(addr.as_slice())),
            amount: record.amount.clone(),
            is_internal_call: record.is_internal_call,
        }
    }
}

impl From<&TransactionRecord> for StagedTransaction {
    fn from(record: &TransactionRecord) -> Self {
        let staged = NewTransaction::from(record);
        Self {
            block_number: staged.block_number,
            block_hash: staged.block_hash,
            transaction_hash: staged.transaction_hash,
            transaction_index: staged.transaction_index,
            from_address: staged.from_address,
            to_address: staged.to_address,
            amount: staged.amount,
            is_internal_call: staged.is_internal_call,
        }
    }
}

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = checkpoint)]
pub(crate) struct CheckpointRow {
    pub id: String,
    pub block_number: i64,
    pub block_hash: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl CheckpointRow {
    pub(crate) fn new(block_number: u64, block_hash: Option<B256>) -> Self {
        Self {
            id: CHECKPOINT_ID.to_string(),
            block_number: block_number as i64,
            block_hash: block_hash.map(|hash| hex_of(hash.as_slice())),
            last_updated: Utc::now(),
        }
    }
}

impl TryFrom<CheckpointRow> for Checkpoint {
    type Error = crate::error::PersistenceError;

    fn try_from(row: CheckpointRow) -> Result<Self, Self::Error> {
        let block_hash = row
            .block_hash
            .map(|raw| {
                raw.parse::<B256>().map_err(|e| crate::error::PersistenceError::CorruptRow {
                    detail: format!("checkpoint.block_hash {raw:?}: {e}"),
                })
            })
            .transpose()?;
        Ok(Self {
            block_number: row.block_number as u64,
            block_hash,
            last_updated: row.last_updated,
        })
    }
}

fn hex_of(bytes: &[u8]) -> String {
    alloy_primitives::hex::encode_prefixed(bytes)
}

/// Parses a stored hex column back into an [`Address`], for call sites that
/// need the typed value (none currently outside of tests).
#[cfg(test)]
pub(crate) fn parse_address(raw: &str) -> Address {
    raw.parse().expect("stored address must be well-formed")
}
