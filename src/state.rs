use std::sync::Arc;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StoreKind};
use crate::crypto::entropy::{EntropySource, OsEntropy};
use crate::error::{AppError, Result};
use crate::repositories::memory::MemorySessionStore;
use crate::repositories::session::{PgSessionStore, SessionStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// Where sessions are persisted.
    pub store: Arc<dyn SessionStore>,
    /// The secure random source for tokens and coin flips.
    pub entropy: Arc<dyn EntropySource>,
    /// The source of "now" for resolution.
    pub clock: Arc<dyn Clock>,
    /// Seconds by which a session may be resolved early.
    pub resolve_grace_secs: i64,
}

impl AppState {
    /// Creates a new `AppState` with the store selected by `config`.
    ///
    /// For PostgreSQL this builds the pool and creates the schema.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match config.store {
            StoreKind::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    AppError::Internal("database URL missing for postgres store".to_string())
                })?;
                let pool = crate::db::create_pool(url, config.db_pool_max_size)?;
                crate::db::ensure_schema(&pool).await?;
                tracing::info!(
                    "✅ PostgreSQL pool initialized (max {} connections)",
                    config.db_pool_max_size
                );
                Arc::new(PgSessionStore::new(pool))
            }
            StoreKind::Memory => {
                tracing::warn!("⚠️ Using in-memory session store, sessions will not survive a restart");
                Arc::new(MemorySessionStore::new())
            }
        };

        Ok(Self::from_parts(
            store,
            Arc::new(OsEntropy),
            Arc::new(SystemClock),
            config.resolve_grace_secs,
        ))
    }

    /// Assembles an `AppState` from explicit collaborators.
    pub fn from_parts(
        store: Arc<dyn SessionStore>,
        entropy: Arc<dyn EntropySource>,
        clock: Arc<dyn Clock>,
        resolve_grace_secs: i64,
    ) -> Self {
        Self {
            store,
            entropy,
            clock,
            resolve_grace_secs,
        }
    }
}
