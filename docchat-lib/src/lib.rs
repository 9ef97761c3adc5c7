//! docchat - document-grounded chat backend
//!
//! # Architecture
//!
//! ```text
//! corpus dir -> Loader -> Chunker -> Embedder -> Store (snapshot)
//!                                                   |
//! Query -> Embedder -> Search <---------------------+
//!                         |
//!                      Context -> Prompt -> ChatModel -> reply
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docchat_lib::{config::Settings, engine::RetrievalEngine};
//!
//! let settings = Settings::load(None)?;
//! let engine = RetrievalEngine::from_settings(&settings)?; // ingests ./data
//!
//! let context = engine.get_context("What is Spring Boot?", settings.retrieval.top_k);
//!
//! // pick up new files
//! engine.reload();
//! ```

pub mod chunk;
pub mod config;
pub mod embed;
pub mod engine;
pub mod error;
pub mod llm;
pub mod loader;
pub mod prompt;
pub mod server;
pub mod store;

pub use error::{Error, Result};
