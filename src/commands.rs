//! CLI command implementations.
//!
//! Context and prompts go to stdout; ingestion summaries and per-file
//! errors go to stderr.

use anyhow::Result;
use docchat_core::chunk::{chunk_document, ChunkParams};
use docchat_core::store::memory::InMemoryStoreProvider;
use docchat_core::RetrievalIndex;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::embedding::create_embedder;
use crate::loader::{expand_dir, load_text_file};
use crate::prompt::grounded_prompt;
use crate::session::{IngestReport, Session};

/// Print the chunks of one file.
pub fn run_chunk(path: &Path, params: &ChunkParams, json: bool) -> Result<()> {
    let doc = load_text_file(path)?;
    let chunks = chunk_document(&doc.name, &doc.text, params);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    if chunks.is_empty() {
        println!("No chunks.");
        return Ok(());
    }
    for chunk in &chunks {
        println!("[{}]", chunk.id);
        println!("{}", chunk.text);
        println!();
    }
    Ok(())
}

/// Build an empty session from configuration.
pub async fn build_session(config: &Config) -> Result<Session> {
    let embedder = create_embedder(&config.embedding)?;
    let index = RetrievalIndex::new(embedder, Arc::new(InMemoryStoreProvider))
        .await?
        .with_chunk_params(config.chunking.params()?);
    Ok(Session::new(index, config.retrieval.n_results))
}

/// Index `files` and every matching file under `dir`.
pub async fn ingest(
    session: &mut Session,
    config: &Config,
    files: &[PathBuf],
    dir: Option<&Path>,
) -> Result<IngestReport> {
    let mut paths = files.to_vec();
    if let Some(dir) = dir {
        paths.extend(expand_dir(dir, &config.loader)?);
    }

    let report = session.add_files(&paths).await;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &IngestReport) {
    for file in &report.indexed {
        eprintln!("Indexed {} chunks for {}", file.chunks, file.name);
    }
    for name in &report.skipped {
        eprintln!("Skipped {} (already indexed)", name);
    }
    for name in &report.empty {
        eprintln!("Skipped {} (no text)", name);
    }
    for err in &report.errors {
        eprintln!("Error processing {}: {}", err.path.display(), err.message);
    }
}

/// Print the retrieved context for `query`.
pub async fn run_retrieve(session: &Session, query: &str) -> Result<()> {
    if let Some(context) = session.context_for(query).await? {
        println!("{}", context);
    }
    Ok(())
}

/// Print the grounded prompt for `question`.
pub async fn run_prompt(session: &Session, question: &str) -> Result<()> {
    let context = session.context_for(question).await?.unwrap_or_default();
    println!("{}", grounded_prompt(question, &context));
    Ok(())
}

/// Line-oriented chat loop.
///
/// | Input | Effect |
/// |-------|--------|
/// | `:add <path>` | index a file |
/// | `:sources` | list indexed files |
/// | `:clear` | drop every document |
/// | `:quit` | exit |
/// | anything else | print retrieved context for the question |
pub async fn run_chat<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut out: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) | (":exit", _) => break,
            (":sources", _) => {
                if session.files().is_empty() {
                    writeln!(out, "No documents indexed.")?;
                }
                for file in session.files() {
                    writeln!(
                        out,
                        "{}  {} chunks  {}",
                        file.name,
                        file.chunks,
                        file.indexed_at.format("%Y-%m-%d %H:%M:%S")
                    )?;
                }
            }
            (":clear", _) => {
                session.clear().await?;
                writeln!(out, "Cleared.")?;
            }
            (":add", path) if !path.trim().is_empty() => {
                let report = session.add_files(&[PathBuf::from(path.trim())]).await;
                print_report(&report);
                writeln!(out, "Indexed {} chunks.", report.total_chunks())?;
            }
            _ => match session.context_for(line).await? {
                Some(context) => writeln!(out, "{}\n", context)?,
                None => writeln!(out, "No document context.\n")?,
            },
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn hash_config() -> Config {
        let mut config = Config::default();
        config.embedding.provider = "hash".to_string();
        config.embedding.dims = Some(128);
        config
    }

    #[tokio::test]
    async fn test_chat_loop() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes.txt");
        fs::write(&notes, "the ferry leaves at noon").unwrap();

        let mut session = build_session(&hash_config()).await.unwrap();
        let script = format!(
            "when does the ferry leave\n:add {}\n:sources\nferry\n:clear\nferry\n:quit\nignored\n",
            notes.display()
        );
        let mut out = Vec::new();
        run_chat(&mut session, script.as_bytes(), &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        let blocks: Vec<&str> = out.lines().collect();
        assert_eq!(blocks[0], "No document context.");
        assert!(out.contains("Indexed 1 chunks."));
        assert!(out.contains("notes.txt  1 chunks"));
        assert!(out.contains("[Source: notes.txt]\nthe ferry leaves at noon"));
        assert!(out.contains("Cleared."));
        assert!(out.trim_end().ends_with("No document context."));
    }

    #[tokio::test]
    async fn test_ingest_with_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "alpha").unwrap();
        fs::write(tmp.path().join("b.txt"), "beta").unwrap();
        fs::write(tmp.path().join("c.bin"), "gamma").unwrap();

        let config = hash_config();
        let mut session = build_session(&config).await.unwrap();
        let report = ingest(&mut session, &config, &[], Some(tmp.path()))
            .await
            .unwrap();
        assert_eq!(report.indexed.len(), 2);
        assert!(report.errors.is_empty());
    }
}
