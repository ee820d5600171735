//! The ingestion daemon: no CLI arguments, configured entirely by the
//! process environment, runs until signaled.
//!
//! Grounded on the node binary's `run_until_ctrl_c` shutdown idiom — a
//! [`CancellationToken`] is fired on `SIGINT`/Ctrl-C and raced against the
//! ingestion loop and the health monitor, both of which exit within one
//! iteration/tick of cancellation rather than being aborted mid-flight.

mod config;

use std::sync::Arc;

use indexer_persistence::{PersistenceLayer, PostgresPersistence};
use indexer_transport::{BlockSource, Transport};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio_util::sync::CancellationToken;

use crate::config::{DaemonConfig, log_config, metrics_addr};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::from_env()?;
    log_config().init_tracing_subscriber(None).ok();

    let addr = metrics_addr();
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(%addr, "prometheus exporter listening");

    tracing::info!(
        endpoints = config.transport.endpoints.len(),
        used_default_rpc = config.transport.used_default(),
        "starting indexer daemon"
    );

    let persistence: Arc<dyn PersistenceLayer> =
        Arc::new(PostgresPersistence::connect(&config.persistence).await?);
    let transport = Transport::new(&config.transport);
    let source: Arc<dyn BlockSource> = Arc::new(transport.clone());

    let cancellation = CancellationToken::new();
    let health_handle = transport.spawn_health_monitor(cancellation.clone());
    let ingestion_handle = tokio::spawn(indexer_ingestion::run(
        source,
        persistence,
        config.ingestion,
        cancellation.clone(),
    ));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, stopping");
    cancellation.cancel();

    let _ = ingestion_handle.await;
    let _ = health_handle.await;
    tracing::info!("indexer daemon stopped");
    Ok(())
}
