//! A chat session over a shared retrieval index.
//!
//! The session remembers which files it has indexed so the same upload is
//! not processed twice, isolates per-file failures during ingestion, and
//! turns a user question into retrieved context.

use anyhow::Result;
use chrono::{DateTime, Utc};
use docchat_core::RetrievalIndex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::loader::load_text_file;

/// A retrieval index shared between tasks. Writers (`index_document`,
/// `clear`) take the write lock; `retrieve` takes the read lock.
pub type SharedIndex = Arc<RwLock<RetrievalIndex>>;

#[derive(Debug, Clone)]
pub struct IndexedFile {
    pub name: String,
    pub chunks: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Result of [`Session::add_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Indexed(usize),
    /// A file with this name was already indexed in this session.
    Skipped,
    /// The text had no words; nothing was stored.
    Empty,
}

#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of [`Session::add_files`].
#[derive(Debug, Default)]
pub struct IngestReport {
    pub indexed: Vec<IndexedFile>,
    pub skipped: Vec<String>,
    pub empty: Vec<String>,
    pub errors: Vec<FileError>,
}

impl IngestReport {
    pub fn total_chunks(&self) -> usize {
        self.indexed.iter().map(|f| f.chunks).sum()
    }
}

pub struct Session {
    index: SharedIndex,
    files: Vec<IndexedFile>,
    n_results: usize,
}

impl Session {
    pub fn new(index: RetrievalIndex, n_results: usize) -> Self {
        Self::with_shared(Arc::new(RwLock::new(index)), n_results)
    }

    pub fn with_shared(index: SharedIndex, n_results: usize) -> Self {
        Self {
            index,
            files: Vec::new(),
            n_results,
        }
    }

    pub fn index(&self) -> SharedIndex {
        Arc::clone(&self.index)
    }

    pub fn files(&self) -> &[IndexedFile] {
        &self.files
    }

    pub fn n_results(&self) -> usize {
        self.n_results
    }

    pub fn is_indexed(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    /// Index `text` under `name` unless that name was already indexed.
    pub async fn add_document(&mut self, name: &str, text: &str) -> Result<AddOutcome> {
        if self.is_indexed(name) {
            info!(filename = %name, "Already indexed, skipping");
            return Ok(AddOutcome::Skipped);
        }

        let chunks = self.index.write().await.index_document(text, name).await?;
        if chunks == 0 {
            return Ok(AddOutcome::Empty);
        }

        self.files.push(IndexedFile {
            name: name.to_string(),
            chunks,
            indexed_at: Utc::now(),
        });
        Ok(AddOutcome::Indexed(chunks))
    }

    /// Load and index each path. A failing file is recorded in the report
    /// and does not stop the others.
    pub async fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> IngestReport {
        let mut report = IngestReport::default();

        for path in paths {
            let path = path.as_ref();
            let result = match load_text_file(path) {
                Ok(doc) => self
                    .add_document(&doc.name, &doc.text)
                    .await
                    .map(|outcome| (doc.name, outcome)),
                Err(e) => Err(e),
            };

            match result {
                Ok((name, AddOutcome::Indexed(_))) => {
                    if let Some(file) = self.files.iter().find(|f| f.name == name) {
                        report.indexed.push(file.clone());
                    }
                }
                Ok((name, AddOutcome::Skipped)) => report.skipped.push(name),
                Ok((name, AddOutcome::Empty)) => report.empty.push(name),
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{:#}", e), "Failed to index file");
                    report.errors.push(FileError {
                        path: path.to_path_buf(),
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        report
    }

    /// Retrieved context for `question`, or `None` when there is nothing
    /// indexed or nothing was retrieved.
    pub async fn context_for(&self, question: &str) -> Result<Option<String>> {
        let index = self.index.read().await;
        if index.is_empty().await? {
            return Ok(None);
        }
        let context = index.retrieve(question, self.n_results).await?;
        Ok(if context.is_empty() {
            None
        } else {
            Some(context)
        })
    }

    /// Clear the index and forget every indexed file.
    pub async fn clear(&mut self) -> Result<()> {
        self.index.write().await.clear().await?;
        self.files.clear();
        Ok(())
    }
}
