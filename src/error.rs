use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A malformed creation payload or a missing/malformed token.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No session exists for the requested token.
    #[error("Session not found")]
    SessionNotFound,

    /// A persistence failure (connectivity, constraint, timeout).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The secure random source could not produce bytes.
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<tokio_postgres::Error> for AppError {
    fn from(e: tokio_postgres::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(e: deadpool_postgres::PoolError) -> Self {
        AppError::Storage(format!("pool: {}", e))
    }
}

impl From<deadpool_postgres::CreatePoolError> for AppError {
    fn from(e: deadpool_postgres::CreatePoolError) -> Self {
        AppError::Storage(format!("create pool: {}", e))
    }
}

impl AppError {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_)
            | AppError::RandomSourceUnavailable(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::InvalidInput(ref msg) => {
                tracing::debug!("Invalid input: {}", msg);
                msg.clone()
            }

            AppError::SessionNotFound => {
                tracing::debug!("Session not found");
                "Session not found".to_string()
            }

            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                "Internal server error".to_string()
            }

            AppError::RandomSourceUnavailable(ref e) => {
                tracing::error!("Random source unavailable: {}", e);
                "Internal server error".to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SessionNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Storage("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::RandomSourceUnavailable("no entropy".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::Storage("password authentication failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
    }
}
