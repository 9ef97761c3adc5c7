//! Vector index backends
//!
//! An index is built once from a complete set of entries and is read-only
//! afterwards. Rebuilding means building a new value; nothing is updated in
//! place, so a built index can be shared freely between concurrent readers.
//!
//! # Usage
//!
//! ```ignore
//! use docchat_lib::store::{IndexEntry, MemoryStore, VectorStore};
//!
//! let entries = chunks.into_iter().zip(embeddings).map(IndexEntry::from).collect();
//! let store = MemoryStore::build(entries)?;
//!
//! // Search by vector similarity
//! let results = store.search(&query_embedding, 5)?;
//! ```

use crate::chunk::Chunk;
use crate::embed::Embedding;
use crate::Result;

/// One stored item: a chunk and the embedding of its text.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Embedding,
}

impl From<(Chunk, Embedding)> for IndexEntry {
    fn from((chunk, embedding): (Chunk, Embedding)) -> Self {
        Self { chunk, embedding }
    }
}

/// A search result with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Similarity score (higher is more similar)
    /// For cosine similarity: -1.0 to 1.0
    pub score: f32,
}

/// Trait for vector index backends
pub trait VectorStore: Send + Sync {
    /// Build a searchable index from all entries at once.
    ///
    /// Fails with [`Error::EmptyCorpus`](crate::Error::EmptyCorpus) when
    /// `entries` is empty.
    fn build(entries: Vec<IndexEntry>) -> Result<Self>
    where
        Self: Sized;

    /// Search for similar chunks
    ///
    /// # Arguments
    /// * `query_embedding` - The query vector
    /// * `k` - Number of results to return, must be positive
    ///
    /// # Returns
    /// Up to `k` results sorted by similarity (highest first), ties in
    /// insertion order. A `k` larger than the index returns everything.
    fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Get total number of stored chunks
    fn len(&self) -> usize;

    /// Check if store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod memory;

pub use memory::*;
