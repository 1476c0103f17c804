//! # docchat core
//!
//! Shared retrieval logic for docchat: the word-window chunker, the data
//! model, the embedding and vector-store traits, an in-memory store, and
//! the [`RetrievalIndex`](index::RetrievalIndex) that ties them together.
//!
//! This crate contains no tokio, network, or filesystem code. Embedding
//! backends and storage backends are injected by the application.
//!
//! ```text
//!  text, filename ──▶ chunk::split ──▶ Embedder::embed ──▶ VectorStore::upsert
//!  query ───────────────────────────▶ Embedder::embed ──▶ VectorStore::search
//!                                                              │
//!                                          "[Source: a.txt]\n…" ◀┘
//! ```

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod store;

pub use error::{IndexError, Result};
pub use index::{format_context, IndexState, RetrievalIndex};
