use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::IngestOutcome;
use crate::llm::ChatMessage;
use crate::prompt::{build_prompt, HistoryMessage};
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Base64-encoded image
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryMessage>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub response: String,
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::error!("Rejected /predict body: {}", e);
        ApiError::Predict
    })?;

    let message = request.message.unwrap_or_default();
    let image = request.image.filter(|img| !img.is_empty());
    let history = request.history.unwrap_or_default();
    tracing::info!("Received message: {}", message);
    if !history.is_empty() {
        tracing::info!("Received history of {} messages", history.len());
    }

    let context = if message.is_empty() {
        String::new()
    } else {
        let engine = state.engine.clone();
        let query = message.clone();
        let top_k = state.top_k;
        let started = Instant::now();
        let context = tokio::task::spawn_blocking(move || engine.get_context(&query, top_k))
            .await
            .map_err(|e| {
                tracing::error!("Context retrieval task failed: {}", e);
                ApiError::Predict
            })?;
        tracing::info!("RAG context retrieval took {:.2?}", started.elapsed());
        context
    };

    let prompt = build_prompt(&history, &context, &message, image.is_some());
    tracing::debug!("Final prompt sent to model:\n{}", prompt);

    let mut chat_message = ChatMessage::user(prompt);
    if let Some(image) = image {
        chat_message = chat_message.with_image(image);
    }

    let started = Instant::now();
    let reply = state.chat.chat(vec![chat_message]).await.map_err(|e| {
        tracing::error!("Chat model {} failed: {}", state.chat.name(), e);
        ApiError::Predict
    })?;
    tracing::info!("{} inference took {:.2?}", state.chat.name(), started.elapsed());

    Ok(Json(PredictResponse { response: reply }))
}

pub async fn reload_docs(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.reload())
        .await
        .map_err(|e| ApiError::Reload(e.to_string()))?;

    match outcome {
        IngestOutcome::Failed(reason) => Err(ApiError::Reload(reason)),
        IngestOutcome::Ready { .. } | IngestOutcome::Empty => {
            Ok(Json(json!({ "status": "Documents reloaded successfully." })))
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "state": state.engine.state(),
        "chunks": state.engine.len(),
    }))
}
