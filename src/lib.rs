//! # docchat
//!
//! Document-grounded chat retrieval. Uploaded documents are split into
//! overlapping word windows, embedded, and stored in an in-memory vector
//! collection; each question retrieves the most similar chunks as
//! source-labelled context for a language model prompt.
//!
//! The retrieval engine itself lives in the `docchat-core` crate. This
//! crate adds configuration, concrete embedding backends, file loading,
//! session bookkeeping, and the `docchat` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌────────────────┐
//! │   Loader   │──▶│   Session    │──▶│ RetrievalIndex │
//! │ txt/md/csv │   │ dedup+errors │   │  chunk+embed   │
//! └────────────┘   └──────┬───────┘   └───────┬────────┘
//!                         │                   │
//!                         ▼                   ▼
//!                   ┌──────────┐        ┌──────────┐
//!                   │  Prompt  │        │ Embedder │
//!                   └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`embedding`] | Local, Ollama, OpenAI, and hash embedders |
//! | [`loader`] | Plain-text file loading and directory expansion |
//! | [`session`] | Shared index, indexed-file registry, per-file errors |
//! | [`prompt`] | Grounded prompt construction |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod embedding;
pub mod loader;
pub mod prompt;
pub mod session;
