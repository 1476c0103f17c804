//! Data types that flow through the chunk → embed → store pipeline.

use serde::{Deserialize, Serialize};

/// A contiguous word window of one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// `<source>_<sequence_index>`.
    pub id: String,
    /// Filename the chunk was extracted from.
    pub source: String,
    /// Zero-based position within the source's chunk sequence.
    pub sequence_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(source: &str, sequence_index: usize, text: String) -> Self {
        Self {
            id: chunk_id(source, sequence_index),
            source: source.to_string(),
            sequence_index,
            text,
        }
    }

    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            chunk_id: self.sequence_index,
        }
    }
}

/// Build the stable identifier for a chunk.
pub fn chunk_id(source: &str, sequence_index: usize) -> String {
    format!("{}_{}", source, sequence_index)
}

/// Metadata stored alongside every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub chunk_id: usize,
}

/// A chunk plus its embedding, as handed to a vector store.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    pub fn from_chunk(chunk: Chunk, embedding: Vec<f32>) -> Self {
        let metadata = chunk.metadata();
        Self {
            id: chunk.id,
            text: chunk.text,
            metadata,
            embedding,
        }
    }
}

/// A stored chunk returned from a similarity search.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Cosine similarity to the query vector.
    pub score: f32,
}
