//! Overlapping word-window chunker.
//!
//! Splits extracted document text into windows of at most `chunk_size`
//! words, where consecutive windows share `overlap` words. Words are the
//! runs of non-whitespace produced by [`str::split_whitespace`]; each chunk
//! is its words joined by a single space.
//!
//! # Algorithm
//!
//! 1. Tokenize on whitespace runs. No words → no chunks.
//! 2. Emit the window `words[start..start + chunk_size]`.
//! 3. Stop once that window reaches the last word; otherwise advance
//!    `start` by `chunk_size - overlap` (always ≥ 1) and repeat.
//!
//! For `W > 0` words this yields
//! `ceil(max(W - overlap, 1) / (chunk_size - overlap))` chunks, and a text
//! shorter than `chunk_size` words is a single chunk.
//!
//! # Example
//!
//! ```rust
//! use docchat_core::chunk::{split, ChunkParams};
//!
//! let params = ChunkParams::new(4, 1).unwrap();
//! let chunks = split("The quick brown fox jumps over the lazy dog", &params);
//! assert_eq!(chunks, vec!["The quick brown fox", "fox jumps over the", "the lazy dog"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::models::Chunk;

/// Default maximum words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 400;
/// Default words shared between consecutive chunks.
pub const DEFAULT_OVERLAP: usize = 50;

/// Validated window parameters.
///
/// Construction guarantees `chunk_size >= 1` and `overlap < chunk_size`,
/// so [`split`] always makes forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkParams")]
pub struct ChunkParams {
    chunk_size: usize,
    overlap: usize,
}

/// Unchecked wire form; deserialization goes through [`ChunkParams::new`].
#[derive(Deserialize)]
struct RawChunkParams {
    chunk_size: usize,
    overlap: usize,
}

impl TryFrom<RawChunkParams> for ChunkParams {
    type Error = IndexError;

    fn try_from(raw: RawChunkParams) -> Result<Self> {
        Self::new(raw.chunk_size, raw.overlap)
    }
}

impl ChunkParams {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IndexError::InvalidChunking(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(IndexError::InvalidChunking(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive windows.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Split text into overlapping word windows.
///
/// Pure and deterministic. Returns an empty vector for empty or
/// whitespace-only input.
pub fn split(text: &str, params: &ChunkParams) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + params.chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += params.step();
    }

    chunks
}

/// Split a document into [`Chunk`]s labelled with their source filename.
pub fn chunk_document(source: &str, text: &str, params: &ChunkParams) -> Vec<Chunk> {
    split(text, params)
        .into_iter()
        .enumerate()
        .map(|(i, t)| Chunk::new(source, i, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn expected_count(w: usize, p: &ChunkParams) -> usize {
        let span = w.saturating_sub(p.overlap()).max(1);
        span.div_ceil(p.step())
    }

    #[test]
    fn test_fox_scenario() {
        let p = ChunkParams::new(4, 1).unwrap();
        let chunks = chunk_document("a.txt", FOX, &p);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["The quick brown fox", "fox jumps over the", "the lazy dog"]
        );
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt_0", "a.txt_1", "a.txt_2"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let p = ChunkParams::default();
        assert!(split("", &p).is_empty());
        assert!(split(" \n\t  \r\n", &p).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let p = ChunkParams::default();
        let chunks = split("  Hello,\n\nworld!  ", &p);
        assert_eq!(chunks, vec!["Hello, world!"]);
    }

    #[test]
    fn test_exact_chunk_size_single_chunk() {
        let p = ChunkParams::new(5, 2).unwrap();
        assert_eq!(split(&words(5), &p).len(), 1);
    }

    #[test]
    fn test_no_trailing_overlap_only_chunk() {
        // 10 words, windows [0..4] [3..7] [6..10]; the last window already
        // reaches the end so no window starting at 9 is emitted.
        let p = ChunkParams::new(4, 1).unwrap();
        let chunks = split(&words(10), &p);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], "w6 w7 w8 w9");
    }

    #[test]
    fn test_chunk_count_formula() {
        for (size, overlap) in [(1, 0), (2, 1), (4, 1), (5, 0), (7, 3), (10, 9)] {
            let p = ChunkParams::new(size, overlap).unwrap();
            for w in 1..60 {
                let n = split(&words(w), &p).len();
                assert_eq!(
                    n,
                    expected_count(w, &p),
                    "size={} overlap={} words={}",
                    size,
                    overlap,
                    w
                );
            }
        }
    }

    #[test]
    fn test_reconstruction_with_overlap_removed() {
        for (size, overlap) in [(3, 0), (4, 1), (6, 4), (50, 10)] {
            let p = ChunkParams::new(size, overlap).unwrap();
            for w in 1..80 {
                let text = words(w);
                let chunks = split(&text, &p);
                let mut rebuilt: Vec<String> = Vec::new();
                for (i, c) in chunks.iter().enumerate() {
                    let ws = c.split(' ').map(str::to_string);
                    if i == 0 {
                        rebuilt.extend(ws);
                    } else {
                        rebuilt.extend(ws.skip(overlap));
                    }
                }
                assert_eq!(rebuilt.join(" "), text, "size={} overlap={}", size, overlap);
            }
        }
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let p = ChunkParams::new(7, 2).unwrap();
        for c in split(&words(100), &p) {
            assert!(c.split(' ').count() <= 7);
        }
    }

    #[test]
    fn test_deterministic() {
        let p = ChunkParams::new(3, 1).unwrap();
        assert_eq!(split(FOX, &p), split(FOX, &p));
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            ChunkParams::new(0, 0),
            Err(IndexError::InvalidChunking(_))
        ));
        assert!(matches!(
            ChunkParams::new(4, 4),
            Err(IndexError::InvalidChunking(_))
        ));
        assert!(ChunkParams::new(4, 3).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let p: ChunkParams = serde_json::from_str(r#"{"chunk_size":4,"overlap":1}"#).unwrap();
        assert_eq!(p, ChunkParams::new(4, 1).unwrap());
        assert_eq!(split(FOX, &p).len(), 3);

        for bad in [
            r#"{"chunk_size":4,"overlap":4}"#,
            r#"{"chunk_size":4,"overlap":9}"#,
            r#"{"chunk_size":0,"overlap":0}"#,
        ] {
            let err = serde_json::from_str::<ChunkParams>(bad).unwrap_err();
            assert!(err.to_string().contains("chunk"), "{}: {}", bad, err);
        }
    }

    #[test]
    fn test_defaults() {
        let p = ChunkParams::default();
        assert_eq!(p.chunk_size(), 400);
        assert_eq!(p.overlap(), 50);
        assert_eq!(p.step(), 350);
    }
}
