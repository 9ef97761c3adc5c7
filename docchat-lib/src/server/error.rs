use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Fixed reply for any `/predict` failure. Internal details stay in the logs.
pub const PREDICT_ERROR_MESSAGE: &str = "Error processing your request with LLaVA.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("predict failed")]
    Predict,
    #[error("reload failed: {0}")]
    Reload(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = match self {
            ApiError::Predict => json!({ "response": PREDICT_ERROR_MESSAGE }),
            ApiError::Reload(reason) => json!({ "error": reason }),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
