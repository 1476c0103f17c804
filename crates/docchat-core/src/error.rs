//! Error kinds surfaced by the retrieval index.
//!
//! Backends (embedders, vector stores) report failures as `anyhow::Error`;
//! the index maps them onto these kinds so callers can tell a per-file
//! indexing failure from an unusable store.

use thiserror::Error;

/// Result alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Retrieval index errors.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Chunking parameters would not make forward progress.
    #[error("invalid chunking parameters: {0}")]
    InvalidChunking(String),

    /// Embedding or storage insertion failed while indexing one document.
    #[error("failed to index '{filename}': {reason}")]
    Indexing { filename: String, reason: String },

    /// The backing collection could not be created, reset, or queried.
    #[error("storage error: {0}")]
    Storage(String),
}

impl IndexError {
    pub(crate) fn indexing(filename: &str, err: anyhow::Error) -> Self {
        IndexError::Indexing {
            filename: filename.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub(crate) fn storage(err: anyhow::Error) -> Self {
        IndexError::Storage(format!("{:#}", err))
    }
}
