//! Pool construction, grounded on the same `bb8` + `diesel_async` wiring
//! used by comparable indexers in the wild (staging `AsyncDieselConnectionManager`
//! behind a `bb8::Pool`).

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::PersistenceConfig;
use crate::error::PersistenceError;

pub(crate) async fn build_pool(
    config: &PersistenceConfig,
) -> Result<Pool<AsyncPgConnection>, PersistenceError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let mut builder = Pool::builder().max_size(config.pool_max_size);
    if let Some(min_idle) = config.pool_min_idle {
        builder = builder.min_idle(Some(min_idle));
    }
    builder
        .build(manager)
        .await
        .map_err(|e| PersistenceError::Config(format!("failed to build connection pool: {e}")))
}
