use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::{handlers, AppState};

/// Requests carry base64 images, so allow much more than axum's 2MB default.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Creates the application router.
///
/// - `POST /predict`: chat reply grounded in retrieved context
/// - `POST /reload-docs`: re-ingest the corpus
/// - `GET /health`: liveness plus engine state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/reload-docs", post(handlers::reload_docs))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
