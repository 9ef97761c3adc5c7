//! Retrieval engine
//!
//! Owns the ingestion pipeline and the query path:
//!
//! ```text
//! corpus dir -> DirectoryLoader -> Chunker -> Embedder -> VectorStore::build
//!                                                              |
//!                                                          (snapshot)
//!                                                              |
//! query ------------------------> Embedder -> search <---------+
//!                                                |
//!                                             context
//! ```
//!
//! The engine holds at most one built index. Ingest builds the replacement
//! off to the side and swaps it in with a single pointer write, so a query
//! always sees either the complete old index or the complete new one.
//! Context retrieval never fails the caller: errors are logged and turn
//! into an empty context.
//!
//! # Usage
//!
//! ```ignore
//! use docchat_lib::engine::RetrievalEngine;
//!
//! let engine = RetrievalEngine::from_settings(&settings)?;
//! let context = engine.get_context("What is Spring Boot?", 3);
//! engine.reload();
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::chunk::{Chunker, FixedSizeChunker};
use crate::config::Settings;
use crate::embed::{self, Embedder};
use crate::loader::DirectoryLoader;
use crate::store::{IndexEntry, MemoryStore, SearchResult, VectorStore};
use crate::{Error, Result};

/// Separator placed between chunk texts in an assembled context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No corpus directory existed when the engine was constructed
    Uninitialized,
    /// The corpus produced no documents or no chunks
    Empty,
    /// An index with at least one entry is being served
    Ready,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Empty => "empty",
            EngineState::Ready => "ready",
        })
    }
}

/// Result of an ingest or reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new index is being served
    Ready { documents: usize, chunks: usize },
    /// The corpus had nothing to index; the engine serves no index
    Empty,
    /// Ingest failed; the previous index (if any) is still being served
    Failed(String),
}

struct Snapshot<S> {
    state: EngineState,
    index: Option<Arc<S>>,
}

impl<S> Snapshot<S> {
    fn without_index(state: EngineState) -> Self {
        Self { state, index: None }
    }
}

/// Ingests a corpus directory and answers similarity queries over it.
pub struct RetrievalEngine<E: Embedder, S: VectorStore = MemoryStore> {
    embedder: E,
    chunker: Box<dyn Chunker>,
    loader: DirectoryLoader,
    corpus_dir: PathBuf,
    current: RwLock<Arc<Snapshot<S>>>,
    // serialises ingests; readers never take it
    writer: Mutex<()>,
}

impl RetrievalEngine<Box<dyn Embedder>> {
    /// Build an engine from settings: configured embedder, fixed-size
    /// chunker, text and PDF loaders. Ingests the corpus if it exists.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = embed::from_settings(&settings.embedding)?;
        let chunker = FixedSizeChunker::new(settings.chunking.chunk_size, settings.chunking.overlap)?;
        Ok(Self::new(
            embedder,
            Box::new(chunker),
            DirectoryLoader::default(),
            settings.corpus.dir.clone(),
        ))
    }
}

impl<E: Embedder, S: VectorStore> RetrievalEngine<E, S> {
    /// Create an engine over `corpus_dir`.
    ///
    /// A missing directory is created and the engine starts
    /// [`Uninitialized`](EngineState::Uninitialized); an existing one is
    /// ingested immediately.
    pub fn new(
        embedder: E,
        chunker: Box<dyn Chunker>,
        loader: DirectoryLoader,
        corpus_dir: impl Into<PathBuf>,
    ) -> Self {
        let engine = Self {
            embedder,
            chunker,
            loader,
            corpus_dir: corpus_dir.into(),
            current: RwLock::new(Arc::new(Snapshot::without_index(EngineState::Uninitialized))),
            writer: Mutex::new(()),
        };

        if engine.corpus_dir.is_dir() {
            engine.ingest();
        } else {
            match fs::create_dir_all(&engine.corpus_dir) {
                Ok(()) => tracing::info!("Created data directory at {}", engine.corpus_dir.display()),
                Err(e) => tracing::error!(
                    "Could not create data directory at {}: {}",
                    engine.corpus_dir.display(),
                    e
                ),
            }
        }
        engine
    }

    /// Load, chunk, embed and index the whole corpus, then swap the result in.
    ///
    /// Never panics or returns an error: failures are logged and reported as
    /// [`IngestOutcome::Failed`], leaving the previous index in place.
    pub fn ingest(&self) -> IngestOutcome {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!("Scanning for documents in {}", self.corpus_dir.display());

        match self.build_index() {
            Ok(Some((index, documents))) => {
                let chunks = index.len();
                self.swap(Snapshot {
                    state: EngineState::Ready,
                    index: Some(Arc::new(index)),
                });
                tracing::info!("Vector index ready: {} documents, {} chunks", documents, chunks);
                IngestOutcome::Ready { documents, chunks }
            }
            Ok(None) => {
                self.swap(Snapshot::without_index(EngineState::Empty));
                tracing::info!("No documents found in {}", self.corpus_dir.display());
                IngestOutcome::Empty
            }
            Err(e) => {
                tracing::error!("Ingest failed, keeping previous index: {}", e);
                IngestOutcome::Failed(e.to_string())
            }
        }
    }

    /// Re-ingest the corpus. Same semantics as [`ingest`](Self::ingest).
    pub fn reload(&self) -> IngestOutcome {
        self.ingest()
    }

    /// Retrieve up to `top_k` chunk texts most similar to `query`, joined by
    /// a blank line, closest first.
    ///
    /// Returns an empty string when no index is available or anything goes
    /// wrong; the error is logged.
    pub fn get_context(&self, query: &str, top_k: usize) -> String {
        match self.search(query, top_k) {
            Ok(results) => results
                .iter()
                .map(|r| r.chunk.content.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR),
            Err(e) => {
                tracing::error!("Error retrieving context: {}", e);
                String::new()
            }
        }
    }

    /// Similarity search against the current index.
    ///
    /// Returns no results when the engine is not ready.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let snapshot = self.snapshot();
        let Some(index) = snapshot.index.as_ref() else {
            return Ok(Vec::new());
        };

        let query_embedding = self.embedder.embed_query(query)?;
        index.search(&query_embedding, top_k)
    }

    pub fn state(&self) -> EngineState {
        self.snapshot().state
    }

    /// Number of chunks in the index currently served.
    pub fn len(&self) -> usize {
        self.snapshot().index.as_ref().map_or(0, |index| index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// The embedder used for both ingest and queries.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    fn snapshot(&self) -> Arc<Snapshot<S>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn swap(&self, next: Snapshot<S>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    /// Returns the built index and the number of documents it came from, or
    /// `None` when there is nothing to index.
    fn build_index(&self) -> Result<Option<(S, usize)>> {
        let report = match self.loader.load(&self.corpus_dir) {
            Ok(report) => report,
            Err(Error::CorpusAccess { path, reason }) => {
                tracing::warn!("Corpus at {} unavailable ({}), treating as empty", path.display(), reason);
                if !path.exists() {
                    if let Err(e) = fs::create_dir_all(&path) {
                        tracing::error!("Could not create data directory at {}: {}", path.display(), e);
                    }
                }
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !report.failures.is_empty() {
            tracing::warn!("{} file(s) could not be decoded and were skipped", report.failures.len());
        }

        let documents: Vec<_> = report
            .documents
            .into_iter()
            .filter(|doc| !doc.text.trim().is_empty())
            .collect();
        if documents.is_empty() {
            return Ok(None);
        }
        tracing::info!("Loaded {} documents", documents.len());

        let chunks = self.chunker.chunk_documents(&documents);
        if chunks.is_empty() {
            return Ok(None);
        }
        tracing::info!("Created {} text chunks with {} chunker", chunks.len(), self.chunker.name());

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_documents(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries = chunks.into_iter().zip(embeddings).map(IndexEntry::from).collect();
        match S::build(entries) {
            Ok(index) => Ok(Some((index, documents.len()))),
            Err(Error::EmptyCorpus) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
