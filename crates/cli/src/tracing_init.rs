//! [`tracing_subscriber`] layering, split into a stdout layer and an
//! optional rotated-file layer, each with its own [`LogFormat`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    EnvFilter, Layer,
    prelude::__tracing_subscriber_SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// The wire format of one log layer.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, one line per event (default).
    #[default]
    Full,
    /// Structured JSON, one object per line — the format production
    /// deployments should use, per the observability contract's
    /// "structured JSON log stream".
    Json,
    /// Multi-line, human-readable; useful interactively.
    Pretty,
    /// Full format with excess whitespace stripped.
    Compact,
}

/// How often the rotated file appender starts a new file.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Settings for the optional rotated-file log layer.
#[derive(Debug, Clone)]
pub struct FileLogConfig {
    pub directory_path: PathBuf,
    pub format: LogFormat,
    pub rotation: LogRotation,
}

/// Settings for the stdout log layer.
#[derive(Debug, Clone, Default)]
pub struct StdoutLogConfig {
    pub format: LogFormat,
}

/// Top-level logging configuration shared by both binaries.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub stdout_logs: Option<StdoutLogConfig>,
    pub file_logs: Option<FileLogConfig>,
}

impl LogConfig {
    /// Stdout-only, full format — the default for both binaries absent any
    /// override.
    pub fn stdout_only(format: LogFormat) -> Self {
        Self { stdout_logs: Some(StdoutLogConfig { format }), file_logs: None }
    }

    /// Builds and installs the global [`tracing`] subscriber from this
    /// configuration, honoring `RUST_LOG` (or `env_filter` if given).
    ///
    /// # Errors
    ///
    /// Returns [`TryInitError`] if a global subscriber is already set.
    pub fn init_tracing_subscriber(&self, env_filter: Option<EnvFilter>) -> Result<(), TryInitError> {
        let file_layer = self.file_logs.as_ref().map(|file_logs| {
            let appender = match file_logs.rotation {
                LogRotation::Minutely => {
                    tracing_appender::rolling::minutely(&file_logs.directory_path, "indexer.log")
                }
                LogRotation::Hourly => {
                    tracing_appender::rolling::hourly(&file_logs.directory_path, "indexer.log")
                }
                LogRotation::Daily => {
                    tracing_appender::rolling::daily(&file_logs.directory_path, "indexer.log")
                }
                LogRotation::Never => {
                    tracing_appender::rolling::never(&file_logs.directory_path, "indexer.log")
                }
            };
            match file_logs.format {
                LogFormat::Full => tracing_subscriber::fmt::layer().with_writer(appender).boxed(),
                LogFormat::Json => {
                    tracing_subscriber::fmt::layer().json().with_writer(appender).boxed()
                }
                LogFormat::Pretty => {
                    tracing_subscriber::fmt::layer().pretty().with_writer(appender).boxed()
                }
                LogFormat::Compact => {
                    tracing_subscriber::fmt::layer().compact().with_writer(appender).boxed()
                }
            }
        });

        let stdout_layer = self.stdout_logs.as_ref().map(|stdout_logs| match stdout_logs.format {
            LogFormat::Full => tracing_subscriber::fmt::layer().boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
            LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        });

        let env_filter = env_filter.unwrap_or_else(EnvFilter::from_default_env);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stdout_layer)
            .try_init()?;
        Ok(())
    }
}

/// Initializes a minimal subscriber for use in tests; ignores repeat calls.
pub fn init_test_tracing() {
    let _ = LogConfig::stdout_only(LogFormat::Full).init_tracing_subscriber(None);
}
