use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::Result,
    models::session::{CoinResult, Session},
    repositories::session::{InsertOutcome, SessionStore},
};

/// Sessions kept in process memory.
///
/// Each operation runs under one lock acquisition, which gives it the same
/// atomicity as the corresponding single SQL statement.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    /// Creates a new, empty `MemorySessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns `true` if no session is stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token: &str, scheduled_at: i64) -> Result<InsertOutcome> {
        let mut sessions = self.sessions.lock().await;

        if sessions.contains_key(token) {
            return Ok(InsertOutcome::DuplicateToken);
        }

        sessions.insert(
            token.to_string(),
            Session {
                token: token.to_string(),
                scheduled_at,
                result: None,
                created_at: Utc::now(),
            },
        );

        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.lock().await.get(token).cloned())
    }

    async fn resolve_if_unset(&self, token: &str, outcome: CoinResult) -> Result<bool> {
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(token) {
            Some(session) if session.result.is_none() => {
                session.result = Some(outcome);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_token() {
        let store = MemorySessionStore::new();
        assert_eq!(store.insert("abc", 10).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert("abc", 20).await.unwrap(), InsertOutcome::DuplicateToken);

        let session = store.get("abc").await.unwrap().unwrap();
        assert_eq!(session.scheduled_at, 10);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_if_unset_is_compare_and_set() {
        let store = MemorySessionStore::new();
        store.insert("abc", 10).await.unwrap();

        assert!(store.resolve_if_unset("abc", CoinResult::Heads).await.unwrap());
        assert!(!store.resolve_if_unset("abc", CoinResult::Tails).await.unwrap());

        let session = store.get("abc").await.unwrap().unwrap();
        assert_eq!(session.result, Some(CoinResult::Heads));
    }

    #[tokio::test]
    async fn test_missing_session() {
        let store = MemorySessionStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
        assert!(!store.resolve_if_unset("nope", CoinResult::Heads).await.unwrap());
        assert!(store.is_empty().await);
    }
}
