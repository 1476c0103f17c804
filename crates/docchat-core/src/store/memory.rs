//! In-memory [`VectorStore`] implementation.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`, with an id → slot
//! map for upsert-by-id. Search is brute-force cosine similarity over all
//! stored vectors; ties keep insertion order.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::models::{ChunkRecord, ScoredChunk};

use super::{StoreProvider, VectorStore};

#[derive(Default)]
struct Inner {
    records: Vec<ChunkRecord>,
    slots: HashMap<String, usize>,
}

/// Ephemeral vector store; contents are lost when dropped.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<()> {
        let mut inner = self.write()?;
        for record in records {
            match inner.slots.get(&record.id).copied() {
                Some(slot) => inner.records[slot] = record,
                None => {
                    let slot = inner.records.len();
                    inner.slots.insert(record.id.clone(), slot);
                    inner.records.push(record);
                }
            }
        }
        Ok(())
    }

    async fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let inner = self.read()?;
        let mut scored: Vec<(usize, f32)> = inner
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i, cosine_similarity(query_vec, &r.embedding)))
            .collect();
        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| {
                let r = &inner.records[i];
                ScoredChunk {
                    id: r.id.clone(),
                    text: r.text.clone(),
                    metadata: r.metadata.clone(),
                    score,
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    async fn sources(&self) -> Result<Vec<String>> {
        let inner = self.read()?;
        let mut seen = Vec::<String>::new();
        for r in &inner.records {
            if !seen.iter().any(|s| s == &r.metadata.source) {
                seen.push(r.metadata.source.clone());
            }
        }
        Ok(seen)
    }
}

/// Provider handing out independent [`InMemoryStore`] collections.
///
/// Each `create` returns a new empty store owned by the caller, so
/// `delete` has nothing to release.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryStoreProvider;

#[async_trait]
impl StoreProvider for InMemoryStoreProvider {
    async fn create(&self, _name: &str) -> Result<Box<dyn VectorStore>> {
        Ok(Box::new(InMemoryStore::new()))
    }

    async fn delete(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}
