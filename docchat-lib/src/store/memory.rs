
use crate::chunk::Chunk;
use crate::embed::Embedding;
use crate::store::{IndexEntry, SearchResult, VectorStore};
use crate::{Error, Result};

/// In-memory vector index.
///
/// Uses brute-force cosine similarity over entries kept in insertion order.
/// Suitable for small corpora (tens of thousands of chunks).
#[derive(Debug)]
pub struct MemoryStore {
    chunks: Vec<Chunk>,
    embeddings: Vec<Embedding>,
    dimension: usize,
}

impl MemoryStore {
    /// Dimension shared by every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl VectorStore for MemoryStore {
    fn build(entries: Vec<IndexEntry>) -> Result<Self> {
        let Some(first) = entries.first() else {
            return Err(Error::EmptyCorpus);
        };
        let dimension = first.embedding.len();
        if dimension == 0 {
            return Err(Error::Index("embeddings must not be empty".to_string()));
        }

        let mut chunks = Vec::with_capacity(entries.len());
        let mut embeddings = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.embedding.len() != dimension {
                return Err(Error::Index(format!(
                    "embedding for chunk {} has dimension {}, expected {}",
                    entry.chunk.id,
                    entry.embedding.len(),
                    dimension
                )));
            }
            chunks.push(entry.chunk);
            embeddings.push(entry.embedding);
        }

        Ok(Self {
            chunks,
            embeddings,
            dimension,
        })
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(Error::InvalidInput("top_k must be positive".to_string()));
        }
        if query.len() != self.dimension {
            return Err(Error::Index(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .map(|embedding| cosine_similarity(query, embedding))
            .enumerate()
            .collect();

        // total order so NaN scores cannot break the sort; stable on ties
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| SearchResult {
                chunk: self.chunks[i].clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
