//! Shared logging setup for `bin/daemon` and `bin/indexer-ctl`, grounded on
//! the same layered `tracing-subscriber` construction both binaries would
//! otherwise duplicate.

mod tracing_init;

pub use tracing_init::{
    FileLogConfig, LogConfig, LogFormat, LogRotation, StdoutLogConfig, init_test_tracing,
};
