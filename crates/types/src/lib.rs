//! Shared record and error types for the EVM transaction indexer.
//!
//! This crate has no I/O of its own. It exists so that the validator,
//! persistence, transport, ingestion, and backfill crates can agree on one
//! definition of "a transaction record" and "a checkpoint" without any of
//! them depending on each other.

mod checkpoint;
mod transaction;

pub use checkpoint::{CHECKPOINT_ID, Checkpoint};
pub use transaction::{RawTransaction, TransactionRecord, ValidationFailure};
