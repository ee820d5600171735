//! Offline maintenance CLI for the indexer's store: manual rollback and
//! one-shot historical backfill. Grounded on the node binary's
//! subcommand-dispatch shape, without its daemon/network concerns.

mod cli;
mod commands;
mod error;

use clap::Parser;
use indexer_cli::{LogConfig, LogFormat};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    LogConfig::stdout_only(LogFormat::Full).init_tracing_subscriber(None).ok();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rollback(args) => args.run().await,
        Commands::Backfill(args) => args.run().await,
    };

    if let Err(error) = result {
        tracing::error!(%error, "command failed");
        std::process::exit(1);
    }
}
