//! Route table.

use axum::routing::{get, post};
use axum::Router;

use crate::http::handlers;
use crate::http::state::AppState;

/// Build the full router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/start-recording", post(handlers::start_recording))
        .route("/api/transcribe", post(handlers::transcribe))
        .route("/api/generate", post(handlers::generate))
        .route("/ws", get(handlers::ws_upgrade))
        .route("/health", get(handlers::health))
        .with_state(state)
}
