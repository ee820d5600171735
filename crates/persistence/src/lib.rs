//! Pooled, transactional Postgres persistence for the indexer.
//!
//! This crate is a pure library: it owns no global pool and starts no
//! background task. Each binary that links it builds its own
//! [`PostgresPersistence`] from its own [`PersistenceConfig`] and holds it
//! behind an `Arc`.

mod config;
mod error;
mod gateway;
mod models;
mod pool;
mod schema;

pub use config::PersistenceConfig;
pub use error::PersistenceError;
pub use gateway::{PersistenceLayer, PostgresPersistence};
