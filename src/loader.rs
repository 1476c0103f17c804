//! Plain-text document loading.
//!
//! Reads `.txt`, `.md`, and `.csv` files as UTF-8. CSV is not parsed;
//! its raw text is indexed like any other document. Directories are
//! expanded with the `[loader]` include/exclude globs.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::LoaderConfig;

/// Extensions accepted by [`load_text_file`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "csv"];

/// A document ready for indexing.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name used as the chunk source label.
    pub name: String,
    pub text: String,
}

/// Read one supported file.
pub fn load_text_file(path: &Path) -> Result<LoadedDocument> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("Not a file path: {}", path.display()))?;

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        bail!(
            "Unsupported file type for {}: expected one of .{}",
            name,
            SUPPORTED_EXTENSIONS.join(", .")
        );
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(LoadedDocument { name, text })
}

/// List the files under `root` matching the loader globs, sorted by path.
pub fn expand_dir(root: &Path, config: &LoaderConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut excludes = vec!["**/.git/**".to_string()];
    excludes.extend(config.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&excludes)?;

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(config.follow_symlinks) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy();

        if exclude_set.is_match(rel_str.as_ref()) || !include_set.is_match(rel_str.as_ref()) {
            continue;
        }
        paths.push(path.to_path_buf());
    }

    paths.sort();
    Ok(paths)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
    }
    Ok(builder.build()?)
}
