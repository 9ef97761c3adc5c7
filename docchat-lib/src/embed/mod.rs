//! Text embedding
//!
//! Two implementations ship with the crate:
//!
//! - [`MiniLmEmbedder`]: sentence-transformers/all-MiniLM-L6-v2 via fastembed
//!   (ONNX runtime), 384 dimensions. Downloads the model on first use.
//! - [`HashingEmbedder`]: offline feature hashing over word tokens. No model,
//!   no network; good enough for keyword-ish retrieval and for tests.
//!
//! # Usage
//!
//! ```ignore
//! use docchat_lib::embed::{Embedder, MiniLmEmbedder};
//!
//! let embedder = MiniLmEmbedder::new()?;
//!
//! // Embed documents (for indexing)
//! let doc_embeddings = embedder.embed_documents(&["Spring Boot is...", "Kafka is..."])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("What is Spring Boot?")?;
//! ```

use crate::config::{EmbeddingProvider, EmbeddingSettings};
use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
///
/// Implementations are shared across concurrent requests, so every method
/// takes `&self`.
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    ///
    /// Some models use different prompts for queries vs documents; this
    /// method is where that distinction belongs.
    fn embed_query(&self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed_documents(texts)
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        (**self).embed_query(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Build the embedder selected in settings.
pub fn from_settings(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    Ok(match settings.provider {
        EmbeddingProvider::Minilm => Box::new(MiniLmEmbedder::new()?),
        EmbeddingProvider::Hashing => Box::new(HashingEmbedder::new(settings.dimension)?),
    })
}

mod hashing;
mod minilm;

pub use hashing::*;
pub use minilm::*;
