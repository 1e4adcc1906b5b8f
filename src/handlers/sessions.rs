use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    services::sessions as session_service,
    state::AppState,
    validation::session::validate_token,
};

/// The request payload for scheduling a session.
#[derive(Deserialize, Debug)]
pub struct CreateSessionRequest {
    /// Epoch seconds at which the coin may be flipped.
    pub timestamp: i64,
}

/// The response payload for a newly scheduled session.
#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub token: String,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response> {
    let body = sonic_rs::to_string(body)
        .map_err(|e| AppError::Internal(format!("Failed to serialize response: {}", e)))?;

    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Schedules a new coin-flip session.
///
/// The body is decoded as JSON whatever its `Content-Type`.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response> {
    let req: CreateSessionRequest = sonic_rs::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected create payload: {}", e);
        AppError::InvalidInput("Invalid request body".to_string())
    })?;

    let token = session_service::create_session(&state, req.timestamp).await?;

    json_response(StatusCode::OK, &CreateSessionResponse { token })
}

/// Shows a session, flipping its coin if it has become due.
#[axum::debug_handler]
pub async fn view_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response> {
    validate_token(&token)?;

    let session = session_service::view_session(&state, &token).await?;

    json_response(StatusCode::OK, &session.view())
}

/// Answers session lookups that carry no token.
pub async fn missing_token() -> AppError {
    AppError::InvalidInput("Token not provided".to_string())
}
