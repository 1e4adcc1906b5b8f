use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use tokio_postgres::NoTls;
use crate::error::Result;
use crate::repositories::session::CREATE_SESSIONS_TABLE;
use std::time::Duration;

/// Creates a new database connection pool.
///
/// # Arguments
///
/// * `database_url` - A PostgreSQL URL or key/value connection string.
/// * `max_size` - The maximum number of pooled connections.
///
/// # Returns
///
/// A `Result` containing the `Pool`.
pub fn create_pool(database_url: &str, max_size: usize) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let mut timeouts = Timeouts::default();
    timeouts.wait = Some(Duration::from_secs(5));
    timeouts.create = Some(Duration::from_secs(2));
    timeouts.recycle = Some(Duration::from_secs(1));

    let mut pool_config = PoolConfig::new(max_size);
    pool_config.timeouts = timeouts;
    cfg.pool = Some(pool_config);

    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
}

/// Creates the sessions table if it does not exist yet.
pub async fn ensure_schema(pool: &Pool) -> Result<()> {
    let client = pool.get().await?;
    client.batch_execute(CREATE_SESSIONS_TABLE).await?;
    Ok(())
}
