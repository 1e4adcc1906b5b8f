use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::{Row, error::SqlState};

use crate::{
    error::{AppError, Result},
    models::session::{CoinResult, Session},
};

/// The outcome of inserting a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// Another session already owns this token. Nothing was written.
    DuplicateToken,
}

/// Persistence for sessions.
///
/// Every method is a single atomic store operation. `resolve_if_unset` is the
/// only mutation of an existing session and must be a compare-and-set.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records a new unresolved session.
    async fn insert(&self, token: &str, scheduled_at: i64) -> Result<InsertOutcome>;

    /// Loads a session by token.
    async fn get(&self, token: &str) -> Result<Option<Session>>;

    /// Stores `outcome` only if the session has no result yet.
    ///
    /// Returns `true` if this call set the value.
    async fn resolve_if_unset(&self, token: &str, outcome: CoinResult) -> Result<bool>;
}

/// The DDL for the sessions table.
pub const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    token        TEXT PRIMARY KEY,
    scheduled_at BIGINT NOT NULL,
    coin_result  TEXT CHECK (coin_result IN ('heads', 'tails')),
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, scheduled_at)
    VALUES ($1, $2)
"#;

const SELECT_SESSION: &str = r#"
    SELECT token, scheduled_at, coin_result, created_at
    FROM sessions
    WHERE token = $1
"#;

const RESOLVE_SESSION: &str = r#"
    UPDATE sessions
    SET coin_result = $1
    WHERE token = $2 AND coin_result IS NULL
"#;

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> Result<Session> {
    let coin_result: Option<String> = row.try_get("coin_result")?;
    let result = coin_result
        .map(|r| r.parse::<CoinResult>())
        .transpose()
        .map_err(AppError::Storage)?;

    Ok(Session {
        token: row.try_get("token")?,
        scheduled_at: row.try_get("scheduled_at")?,
        result,
        created_at: row.try_get("created_at")?,
    })
}

/// Sessions stored in PostgreSQL.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: Pool,
}

impl PgSessionStore {
    /// Creates a new `PgSessionStore` over an existing pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, token: &str, scheduled_at: i64) -> Result<InsertOutcome> {
        let client = self.pool.get().await?;
        let statement = client.prepare_cached(INSERT_SESSION).await?;

        match client.execute(&statement, &[&token, &scheduled_at]).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Ok(InsertOutcome::DuplicateToken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let client = self.pool.get().await?;
        let statement = client.prepare_cached(SELECT_SESSION).await?;
        let row = client.query_opt(&statement, &[&token]).await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn resolve_if_unset(&self, token: &str, outcome: CoinResult) -> Result<bool> {
        let client = self.pool.get().await?;
        let statement = client.prepare_cached(RESOLVE_SESSION).await?;
        let updated = client
            .execute(&statement, &[&outcome.as_str(), &token])
            .await?;
        Ok(updated == 1)
    }
}
