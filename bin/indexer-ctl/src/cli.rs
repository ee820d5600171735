use clap::{Parser, Subcommand};

use crate::commands::{BackfillArgs, RollbackArgs};

/// Offline maintenance operations against the indexer's store.
///
/// Never run alongside a live daemon process: both `rollback` and
/// `backfill` assume exclusive write access to the checkpoint row.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deletes every transaction from a given block onward and rewinds the
    /// checkpoint to just before it.
    Rollback(RollbackArgs),
    /// Fetches and commits a historical block range.
    Backfill(BackfillArgs),
}
