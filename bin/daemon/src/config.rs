use indexer_cli::LogConfig;
use indexer_ingestion::IngestionConfig;
use indexer_persistence::PersistenceConfig;
use indexer_transport::TransportConfig;

/// Everything the daemon needs, assembled entirely from the process
/// environment — the daemon takes no CLI arguments.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub persistence: PersistenceConfig,
    pub transport: TransportConfig,
    pub ingestion: IngestionConfig,
}

impl DaemonConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            persistence: PersistenceConfig::from_env()?,
            transport: TransportConfig::from_env()?,
            ingestion: IngestionConfig::from_env(),
        })
    }
}

/// Stdout-only logging, `RUST_LOG`-driven, full text format — the teacher's
/// node binary defaults the same way absent an explicit `--log-format`.
pub fn log_config() -> LogConfig {
    use indexer_cli::LogFormat;
    LogConfig::stdout_only(LogFormat::Full)
}

/// `METRICS_ADDR` (`host:port`) the Prometheus exporter listens on. Falls
/// back to `0.0.0.0:9000` — the daemon takes no CLI arguments, so this is
/// the one metrics-related override available.
pub fn metrics_addr() -> std::net::SocketAddr {
    std::env::var("METRICS_ADDR")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| ([0, 0, 0, 0], 9000).into())
}
