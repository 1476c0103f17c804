//! Vector storage abstraction.
//!
//! A [`VectorStore`] is one collection of embedded chunks supporting
//! upsert-by-id and nearest-neighbour search. A [`StoreProvider`] creates
//! and deletes named collections, which is how the index resets itself.
//! Together they make the storage/search backend swappable without
//! touching chunking or context formatting.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChunkRecord, ScoredChunk};

/// One collection of embedded chunks.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert`](VectorStore::upsert) | Insert records, replacing any with the same id |
/// | [`search`](VectorStore::search) | Top-k by similarity, most similar first |
/// | [`count`](VectorStore::count) | Number of stored records |
/// | [`sources`](VectorStore::sources) | Distinct sources in first-seen order |
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records. A record whose id already exists replaces the
    /// stored one in place.
    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<()>;

    /// Return at most `k` records ordered by descending similarity.
    ///
    /// Ties must be broken consistently (insertion order) so repeated
    /// searches against an unchanged store return identical results.
    async fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    async fn count(&self) -> Result<usize>;

    async fn sources(&self) -> Result<Vec<String>>;
}

/// Factory for named collections.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    /// Create a fresh, empty collection.
    async fn create(&self, name: &str) -> Result<Box<dyn VectorStore>>;

    /// Delete a collection. Deleting an unknown collection is not an error.
    async fn delete(&self, name: &str) -> Result<()>;
}
