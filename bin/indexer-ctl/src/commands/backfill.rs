//! The `backfill` subcommand: a one-shot historical range fill, for catching
//! up a fresh store or repairing a gap without running the daemon.

use clap::Args;
use indexer_backfill::DEFAULT_BATCH_BLOCKS;
use indexer_persistence::{PersistenceConfig, PostgresPersistence};
use indexer_transport::{Transport, TransportConfig};

/// Fetches and commits `[start, end]` inclusive.
#[derive(Debug, Args)]
pub struct BackfillArgs {
    /// First block number to backfill, inclusive.
    #[arg(long)]
    start: u64,
    /// Last block number to backfill, inclusive.
    #[arg(long)]
    end: u64,
    /// Blocks fetched and committed per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_BLOCKS)]
    batch_size: u64,
}

impl BackfillArgs {
    pub async fn run(self) -> anyhow::Result<()> {
        let persistence_config = PersistenceConfig::from_env()?;
        let transport_config = TransportConfig::from_env()?;

        let store = PostgresPersistence::connect(&persistence_config).await?;
        let transport = Transport::new(&transport_config);

        tracing::info!(start = self.start, end = self.end, batch_size = self.batch_size, "starting backfill");
        indexer_backfill::backfill(&transport, &store, self.start, self.end, self.batch_size)
            .await?;
        tracing::info!("backfill complete");
        Ok(())
    }
}
