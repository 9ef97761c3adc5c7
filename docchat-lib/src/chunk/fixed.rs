use crate::chunk::{generate_id, Chunk, ChunkMetadata, Chunker};
use crate::{Error, Result};

/// Fixed-size chunker - splits by character count with overlap
///
/// Lengths are counted in chars, so slices always land on UTF-8 boundaries.
/// Consecutive chunks share exactly `overlap` chars and the final chunk ends
/// at the end of the content, so the first chunk followed by every later
/// chunk minus its leading overlap reconstructs the input.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Create a chunker. Requires `0 < chunk_size` and `overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput("chunk_size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::InvalidInput(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Chunker for FixedSizeChunker {
    fn name(&self) -> &str {
        "fixed"
    }

    fn chunk(&self, content: &str, mut metadata: ChunkMetadata) -> Vec<Chunk> {
        // byte offset of every char, plus the end of the string
        let offsets: Vec<usize> = content
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(content.len()))
            .collect();
        let total_chars = offsets.len() - 1;
        if total_chars == 0 {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let total = if total_chars <= self.chunk_size {
            1
        } else {
            1 + (total_chars - self.chunk_size).div_ceil(stride)
        };
        metadata.total_chunks = Some(total);

        let mut chunks = Vec::with_capacity(total);
        for i in 0..total {
            let start = i * stride;
            let end = (start + self.chunk_size).min(total_chars);
            let c = &content[offsets[start]..offsets[end]];

            let mut m = metadata.clone();
            m.position = start;

            chunks.push(Chunk {
                id: generate_id(c),
                content: c.to_string(),
                metadata: m,
            });
        }
        chunks
    }
}
