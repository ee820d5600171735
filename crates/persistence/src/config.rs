//! Environment-driven configuration for the connection pool.

use crate::error::PersistenceError;

const ENV_DB_HOST: &str = "DB_HOST";
const ENV_DB_PORT: &str = "DB_PORT";
const ENV_DB_USER: &str = "DB_USER";
const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
const ENV_DB_NAME: &str = "DB_NAME";
const ENV_POOL_MAX_SIZE: &str = "INDEXER_DATABASE_POOL_MAX_SIZE";
const ENV_POOL_MIN_IDLE: &str = "INDEXER_DATABASE_POOL_MIN_IDLE";

const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Pool sizing and connection settings for [`crate::PostgresPersistence`].
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Postgres connection string assembled from `DB_HOST`/`DB_PORT`/
    /// `DB_USER`/`DB_PASSWORD`/`DB_NAME`.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub pool_max_size: u32,
    /// Minimum number of idle connections the pool keeps warm.
    pub pool_min_idle: Option<u32>,
}

impl PersistenceConfig {
    /// Reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Config`] if any of `DB_HOST`, `DB_USER`,
    /// or `DB_NAME` is unset, or a numeric override fails to parse.
    pub fn from_env() -> Result<Self, PersistenceError> {
        let host = require_env(ENV_DB_HOST)?;
        let user = require_env(ENV_DB_USER)?;
        let name = require_env(ENV_DB_NAME)?;
        let password = std::env::var(ENV_DB_PASSWORD).unwrap_or_default();
        let port = match std::env::var(ENV_DB_PORT) {
            Ok(raw) => {
                raw.parse::<u16>().map_err(|e| PersistenceError::Config(format!("{ENV_DB_PORT}: {e}")))?
            }
            Err(_) => 5432,
        };

        let database_url = format!("postgres://{user}:{password}@{host}:{port}/{name}");

        let pool_max_size = match std::env::var(ENV_POOL_MAX_SIZE) {
            Ok(raw) => raw
                .parse()
                .map_err(|e| PersistenceError::Config(format!("{ENV_POOL_MAX_SIZE}: {e}")))?,
            Err(_) => DEFAULT_POOL_MAX_SIZE,
        };
        let pool_min_idle = match std::env::var(ENV_POOL_MIN_IDLE) {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|e| PersistenceError::Config(format!("{ENV_POOL_MIN_IDLE}: {e}")))?,
            ),
            Err(_) => None,
        };
        Ok(Self { database_url, pool_max_size, pool_min_idle })
    }
}

fn require_env(name: &str) -> Result<String, PersistenceError> {
    std::env::var(name).map_err(|_| PersistenceError::Config(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_host() {
        // SAFETY: test runs single-threaded w.r.t. this var via serial env access is not
        // guaranteed across the whole suite, but this var is unique to this test module.
        unsafe {
            std::env::remove_var(ENV_DB_HOST);
        }
        assert!(PersistenceConfig::from_env().is_err());
    }
}
