//! The retrieval index: chunk, embed, store, and answer similarity queries.
//!
//! [`RetrievalIndex`] owns one vector-store collection plus the injected
//! [`Embedder`]. It is explicitly constructed and passed around; there is
//! no global instance. Mutating operations take `&mut self`, so a single
//! owner serializes `index_document` and `clear` against each other and
//! against `retrieve`. Share it across tasks behind an async `RwLock`.
//!
//! # State machine
//!
//! ```text
//!            index_document (≥1 chunk)
//!   Empty ─────────────────────────────▶ Populated ──┐
//!     ▲                                      │  ▲    │ index_document
//!     └────────────── clear ─────────────────┘  └────┘
//! ```
//!
//! # Re-indexing a filename
//!
//! Chunk ids are `<filename>_<i>`, so indexing the same filename again
//! collides. Colliding records are overwritten in place; nothing is ever
//! removed, so the index size never decreases between clears. A shorter
//! new version leaves the old version's higher-numbered chunks in place.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chunk::{chunk_document, ChunkParams};
use crate::embedding::{embed_one, Embedder};
use crate::error::{IndexError, Result};
use crate::models::{ChunkRecord, ScoredChunk};
use crate::store::{StoreProvider, VectorStore};

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "doc_context";

/// Default number of chunks returned by [`RetrievalIndex::retrieve`].
pub const DEFAULT_N_RESULTS: usize = 5;

/// How many times `clear` tries to create a fresh collection.
const CLEAR_ATTEMPTS: usize = 3;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Empty,
    Populated,
}

pub struct RetrievalIndex {
    embedder: Arc<dyn Embedder>,
    provider: Arc<dyn StoreProvider>,
    store: Box<dyn VectorStore>,
    collection: String,
    params: ChunkParams,
}

impl RetrievalIndex {
    /// Create an index with an empty collection named [`DEFAULT_COLLECTION`].
    pub async fn new(
        embedder: Arc<dyn Embedder>,
        provider: Arc<dyn StoreProvider>,
    ) -> Result<Self> {
        Self::with_collection(embedder, provider, DEFAULT_COLLECTION).await
    }

    pub async fn with_collection(
        embedder: Arc<dyn Embedder>,
        provider: Arc<dyn StoreProvider>,
        collection: &str,
    ) -> Result<Self> {
        let store = provider
            .create(collection)
            .await
            .map_err(IndexError::storage)?;
        Ok(Self {
            embedder,
            provider,
            store,
            collection: collection.to_string(),
            params: ChunkParams::default(),
        })
    }

    /// Override the chunking window used by [`index_document`](Self::index_document).
    pub fn with_chunk_params(mut self, params: ChunkParams) -> Self {
        self.params = params;
        self
    }

    pub fn chunk_params(&self) -> &ChunkParams {
        &self.params
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Chunk, embed, and store one document.
    ///
    /// Returns the number of chunks written. Text with no words is a no-op
    /// returning `Ok(0)`. Embedding or storage failures surface as
    /// [`IndexError::Indexing`] and leave previously indexed data intact.
    pub async fn index_document(&mut self, text: &str, filename: &str) -> Result<usize> {
        let chunks = chunk_document(filename, text, &self.params);
        if chunks.is_empty() {
            debug!(filename = %filename, "No words to index");
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| IndexError::indexing(filename, e))?;

        if vectors.len() != chunks.len() {
            return Err(IndexError::Indexing {
                filename: filename.to_string(),
                reason: format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    chunks.len()
                ),
            });
        }

        let n = chunks.len();
        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(c, v)| ChunkRecord::from_chunk(c, v))
            .collect();

        self.store
            .upsert(records)
            .await
            .map_err(|e| IndexError::indexing(filename, e))?;

        info!(filename = %filename, chunks = n, "Indexed {} chunks for {}", n, filename);
        Ok(n)
    }

    /// Retrieve the most similar chunks, formatted as prompt context.
    ///
    /// Each hit renders as `"[Source: {source}]\n{text}"`; hits are joined
    /// by a blank line, most similar first. Returns `""` without touching
    /// the embedder when the index is empty, the query is blank, or
    /// `n_results` is zero.
    pub async fn retrieve(&self, query: &str, n_results: usize) -> Result<String> {
        let hits = self.retrieve_chunks(query, n_results).await?;
        Ok(format_context(&hits))
    }

    /// Same as [`retrieve`](Self::retrieve) but returns the scored chunks.
    pub async fn retrieve_chunks(&self, query: &str, n_results: usize) -> Result<Vec<ScoredChunk>> {
        if query.trim().is_empty() || n_results == 0 {
            return Ok(Vec::new());
        }

        let total = self.len().await?;
        if total == 0 {
            return Ok(Vec::new());
        }

        let k = n_results.min(total);
        let query_vec = embed_one(self.embedder.as_ref(), query)
            .await
            .map_err(IndexError::storage)?;
        let hits = self
            .store
            .search(&query_vec, k)
            .await
            .map_err(IndexError::storage)?;

        debug!(k, hits = hits.len(), "Retrieved context chunks");
        Ok(hits)
    }

    /// Drop every chunk and embedding.
    ///
    /// The old collection is deleted (failures are logged and ignored)
    /// and a fresh one is created, retrying creation a few times. If no
    /// fresh collection can be created the current one is kept and
    /// [`IndexError::Storage`] is returned.
    pub async fn clear(&mut self) -> Result<()> {
        if let Err(e) = self.provider.delete(&self.collection).await {
            warn!(collection = %self.collection, error = %e, "Failed to delete collection");
        }

        let mut last_err = None;
        for attempt in 1..=CLEAR_ATTEMPTS {
            match self.provider.create(&self.collection).await {
                Ok(store) => {
                    self.store = store;
                    info!(collection = %self.collection, "Cleared retrieval index");
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        collection = %self.collection,
                        attempt,
                        error = %e,
                        "Failed to create fresh collection"
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(IndexError::storage(last_err.unwrap_or_else(|| {
            anyhow::anyhow!("could not create collection '{}'", self.collection)
        })))
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> Result<usize> {
        self.store.count().await.map_err(IndexError::storage)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    pub async fn state(&self) -> Result<IndexState> {
        Ok(if self.is_empty().await? {
            IndexState::Empty
        } else {
            IndexState::Populated
        })
    }

    /// Distinct source filenames, in the order they were first indexed.
    pub async fn sources(&self) -> Result<Vec<String>> {
        self.store.sources().await.map_err(IndexError::storage)
    }
}

/// Render retrieved chunks as source-labelled context.
pub fn format_context(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|h| format!("[Source: {}]\n{}", h.metadata.source, h.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
