//! Multi-endpoint EVM RPC transport: health-filtered routing plus per-call
//! retry with exponential backoff.
//!
//! Constructed once per binary, shared behind an `Arc`, never a
//! module-level singleton — see [`Transport::new`].

mod config;
mod convert;
mod error;
mod health;
mod source;
mod transport;

pub use config::{
    DEFAULT_MAX_RETRIES, HEALTH_CHECK_INTERVAL, RETRY_BASE_DELAY, STALE_THRESHOLD, TransportConfig,
};
pub use convert::block_to_raw_transactions;
pub use error::TransportError;
pub use health::EndpointHealth;
pub use source::BlockSource;
pub use transport::Transport;
