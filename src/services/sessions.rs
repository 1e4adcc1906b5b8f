use chrono::DateTime;

use crate::{
    crypto::{coin, token},
    error::{AppError, Result},
    models::session::{Session, SessionState},
    repositories::session::InsertOutcome,
    state::AppState,
};

/// How many fresh tokens are tried before a duplicate is reported as a failure.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Creates a new pending session scheduled at `scheduled_at`.
///
/// Any timestamp is accepted. One in the past makes the session resolve on
/// its first view.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `scheduled_at` - Epoch seconds at which the coin may be flipped.
///
/// # Returns
///
/// A `Result` containing the new session's token.
pub async fn create_session(state: &AppState, scheduled_at: i64) -> Result<String> {
    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let token = token::generate_token(state.entropy.as_ref())?;

        match state.store.insert(&token, scheduled_at).await? {
            InsertOutcome::Inserted => {
                let scheduled = DateTime::from_timestamp(scheduled_at, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| scheduled_at.to_string());
                tracing::info!(token = %token, scheduled = %scheduled, "Session created");
                return Ok(token);
            }
            InsertOutcome::DuplicateToken => {
                tracing::warn!(attempt, "Generated token collided with an existing session");
            }
        }
    }

    Err(AppError::Storage(format!(
        "token collision on {} consecutive attempts",
        MAX_TOKEN_ATTEMPTS
    )))
}

/// Loads a session, resolving it first if its scheduled moment has arrived.
///
/// A due session is flipped and stored with a compare-and-set. When another
/// viewer stored a result first, the stored result is re-read and returned,
/// so the caller always sees the persisted outcome.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `token` - The session token.
///
/// # Returns
///
/// A `Result` containing the `Session` as it is stored after this call.
pub async fn view_session(state: &AppState, token: &str) -> Result<Session> {
    let mut session = state
        .store
        .get(token)
        .await?
        .ok_or(AppError::SessionNotFound)?;

    let now = state.clock.now();

    match session.state_at(now, state.resolve_grace_secs) {
        SessionState::Resolved(_) | SessionState::Pending => Ok(session),
        SessionState::Due => {
            let outcome = coin::flip(state.entropy.as_ref())?;

            if state.store.resolve_if_unset(token, outcome).await? {
                tracing::info!(token = %token, outcome = %outcome, "Session resolved");
                session.result = Some(outcome);
                return Ok(session);
            }

            tracing::debug!(token = %token, "Session resolved concurrently, re-reading");
            let stored = state
                .store
                .get(token)
                .await?
                .ok_or(AppError::SessionNotFound)?;

            if stored.result.is_none() {
                return Err(AppError::Storage(format!(
                    "session {} was not resolved after a failed compare-and-set",
                    token
                )));
            }

            Ok(stored)
        }
    }
}
