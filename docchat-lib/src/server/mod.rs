//! HTTP surface
//!
//! A thin axum layer over the retrieval engine and the chat model. Handlers
//! never surface retrieval errors; chat failures become a fixed 500 reply.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::embed::Embedder;
use crate::engine::RetrievalEngine;
use crate::llm::ChatModel;
use crate::Result;

mod error;
mod handlers;
mod router;

pub use error::{ApiError, PREDICT_ERROR_MESSAGE};
pub use handlers::{PredictRequest, PredictResponse};
pub use router::router;

/// Engine type served over HTTP.
pub type SharedEngine = Arc<RetrievalEngine<Box<dyn Embedder>>>;

/// Shared application state.
pub struct AppState {
    pub engine: SharedEngine,
    pub chat: Arc<dyn ChatModel>,
    /// Chunks of context retrieved per request
    pub top_k: usize,
}

impl AppState {
    pub fn new(engine: SharedEngine, chat: Arc<dyn ChatModel>, top_k: usize) -> Arc<Self> {
        Arc::new(Self { engine, chat, top_k })
    }
}

/// Serve the router on `listener` until ctrl-c.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
