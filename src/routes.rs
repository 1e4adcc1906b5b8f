use axum::{
    Router,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, state::AppState};

/// Builds the CORS layer.
///
/// `None` allows any origin.
pub fn cors_layer(allowed_origins: Option<&[String]>) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    let cors = match allowed_origins {
        None => cors.allow_origin(Any),
        Some(origins) => {
            let origins = origins
                .iter()
                .map(|o| {
                    o.parse::<HeaderValue>()
                        .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            cors.allow_origin(origins)
        }
    };

    Ok(cors)
}

/// Builds the application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/create", post(handlers::sessions::create_session))
        .route("/session", get(handlers::sessions::missing_token))
        .route("/session/", get(handlers::sessions::missing_token))
        .route("/session/{token}", get(handlers::sessions::view_session))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(cors)
}
