//! The canonical transaction record and its pre-validation wire shape.

use alloy_primitives::{Address, B256};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// A transaction as received from the RPC transport, before validation.
///
/// Every field is loosely typed on purpose: the point of this struct is to
/// hold whatever the transport handed back (or whatever a test constructs)
/// long enough for [`crate::ValidationFailure`] to describe precisely what,
/// if anything, is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Block number the transaction was included in.
    pub block_number: i64,
    /// 0x-prefixed 32-byte block hash.
    pub block_hash: String,
    /// 0x-prefixed 32-byte transaction hash.
    pub transaction_hash: String,
    /// Index of the transaction within its block.
    pub transaction_index: i64,
    /// 0x-prefixed 20-byte sender address.
    pub from_address: String,
    /// 0x-prefixed 20-byte recipient address, absent for contract creation.
    pub to_address: Option<String>,
    /// Exact-precision transfer amount, as a decimal string.
    pub amount: String,
    /// Whether this transaction was synthesized from an internal call trace.
    pub is_internal_call: Option<bool>,
}

/// A transaction record that has passed [`crate::validate`] and is fit to persist.
///
/// `amount` is a [`BigDecimal`] rather than any floating-point or
/// limited-mantissa integer type: transferred value must round-trip through
/// storage exactly, and `BigDecimal` is parsed once, at validation time,
/// and never re-parsed on the way to the database column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Block number the transaction was included in.
    pub block_number: u64,
    /// Canonical hash of the containing block.
    pub block_hash: B256,
    /// Hash of the transaction itself.
    pub transaction_hash: B256,
    /// Index of the transaction within its block.
    pub transaction_index: u32,
    /// Sender address.
    pub from_address: Address,
    /// Recipient address, `None` for contract creation.
    pub to_address: Option<Address>,
    /// Exact transfer amount.
    pub amount: BigDecimal,
    /// Whether this transaction was synthesized from an internal call trace.
    pub is_internal_call: bool,
}

impl TransactionRecord {
    /// The primary key under which this record is idempotent:
    /// `(transaction_hash, block_number)`, per the store's uniqueness contract.
    pub const fn idempotency_key(&self) -> (B256, u64) {
        (self.transaction_hash, self.block_number)
    }
}

/// One reason a [`RawTransaction`] was rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Block number of the offending transaction, if one could be determined.
    pub block_number: i64,
    /// Human-readable reason the record was rejected.
    pub reason: String,
}

impl ValidationFailure {
    /// Builds a new failure entry.
    pub fn new(block_number: i64, reason: impl Into<String>) -> Self {
        Self { block_number, reason: reason.into() }
    }
}
