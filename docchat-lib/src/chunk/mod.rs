//! Document chunking
//!
//! Documents are split into bounded, overlapping segments before embedding.
//! Every chunk carries a back-reference to its source document (by id, not
//! by ownership) and its character offset within that document.
//!
//! # Implementing a Chunker
//!
//! ```ignore
//! use docchat_lib::chunk::{Chunker, Chunk, ChunkMetadata};
//!
//! struct MyChunker { /* ... */ }
//!
//! impl Chunker for MyChunker {
//!     fn chunk(&self, content: &str, metadata: ChunkMetadata) -> Vec<Chunk> {
//!         // Your chunking logic here
//!         todo!()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "mine"
//!     }
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::loader::Document;

/// A chunk of text with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Chunk {
    /// Content hash of this chunk
    pub id: String,
    /// The text content of this chunk
    pub content: String,
    /// Metadata about the source and position
    pub metadata: ChunkMetadata,
}

/// Metadata associated with a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ChunkMetadata {
    /// Source document identifier (the file path)
    pub source_id: Option<String>,
    /// Loader that produced the source document (e.g. "text", "pdf")
    pub source_type: Option<String>,
    /// Page of the source document, for page-structured formats
    pub page: Option<u32>,
    /// Character offset of the chunk within the source text
    pub position: usize,
    /// Total number of chunks from this source
    pub total_chunks: Option<usize>,
}

impl ChunkMetadata {
    /// Base metadata for every chunk cut from `document`.
    pub fn for_document(document: &Document) -> Self {
        Self {
            source_id: Some(document.source.clone()),
            source_type: Some(document.kind.to_string()),
            page: document.page,
            ..Self::default()
        }
    }
}

/// Trait for document chunking strategies
pub trait Chunker: Send + Sync {
    /// Split content into chunks
    ///
    /// # Arguments
    /// * `content` - The text content to chunk
    /// * `metadata` - Base metadata to attach to each chunk
    ///
    /// # Returns
    /// A vector of chunks, each with ids and position metadata
    fn chunk(&self, content: &str, metadata: ChunkMetadata) -> Vec<Chunk>;

    /// Returns the name of this chunking strategy
    fn name(&self) -> &str;

    /// Chunk a whole sequence of documents, in order.
    fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk(&doc.text, ChunkMetadata::for_document(doc)))
            .collect()
    }
}

pub(crate) fn generate_id(string: &str) -> String {
    let mut hasher = DefaultHasher::new();
    string.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

mod fixed;

pub use fixed::*;
