//! # docchat CLI
//!
//! Index plain-text documents into an in-memory retrieval index and print
//! the context (or full grounded prompt) a language model would receive.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docchat chunk <file>` | Show how a file is split into chunks |
//! | `docchat retrieve "<query>" --file F` | Index files and print retrieved context |
//! | `docchat prompt "<question>" --file F` | Index files and print the grounded prompt |
//! | `docchat chat --file F` | Interactive loop on stdin |
//!
//! ## Examples
//!
//! ```bash
//! docchat chunk notes.txt --chunk-size 4 --overlap 1
//! docchat retrieve "refund policy" --file policy.md --dir ./handbook -n 3
//! docchat prompt "When is the office open?" --file faq.txt
//! docchat --config ./docchat.toml chat --dir ./docs
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use docchat::commands;
use docchat::config::load_config;
use docchat_core::chunk::ChunkParams;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// docchat: retrieve source-labelled context from your documents.
#[derive(Parser)]
#[command(name = "docchat", version, about)]
struct Cli {
    /// Path to a configuration file (TOML). Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Files to index before answering.
#[derive(clap::Args)]
struct Inputs {
    /// Document to index (.txt, .md, .csv). Repeatable.
    #[arg(long = "file", short = 'f')]
    files: Vec<PathBuf>,

    /// Directory to scan with the `[loader]` globs.
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into chunks and print them.
    Chunk {
        file: PathBuf,

        /// Words per chunk (defaults to `chunking.chunk_size`).
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Words shared by consecutive chunks (defaults to `chunking.overlap`).
        #[arg(long)]
        overlap: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Index documents and print the context retrieved for a query.
    Retrieve {
        query: String,

        #[command(flatten)]
        inputs: Inputs,

        /// Number of chunks to retrieve (defaults to `retrieval.n_results`).
        #[arg(short = 'n', long)]
        n_results: Option<usize>,
    },

    /// Index documents and print the grounded prompt for a question.
    Prompt {
        question: String,

        #[command(flatten)]
        inputs: Inputs,

        #[arg(short = 'n', long)]
        n_results: Option<usize>,
    },

    /// Index documents, then answer questions read from stdin.
    Chat {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "docchat=debug,docchat_core=debug"
    } else {
        "docchat=info,docchat_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Chunk {
            file,
            chunk_size,
            overlap,
            json,
        } => {
            let params = ChunkParams::new(
                chunk_size.unwrap_or(config.chunking.chunk_size),
                overlap.unwrap_or(config.chunking.overlap),
            )?;
            commands::run_chunk(&file, &params, json)?;
        }
        Commands::Retrieve {
            query,
            inputs,
            n_results,
        } => {
            if let Some(n) = n_results {
                config.retrieval.n_results = n;
            }
            let mut session = commands::build_session(&config).await?;
            commands::ingest(&mut session, &config, &inputs.files, inputs.dir.as_deref()).await?;
            commands::run_retrieve(&session, &query).await?;
        }
        Commands::Prompt {
            question,
            inputs,
            n_results,
        } => {
            if let Some(n) = n_results {
                config.retrieval.n_results = n;
            }
            let mut session = commands::build_session(&config).await?;
            commands::ingest(&mut session, &config, &inputs.files, inputs.dir.as_deref()).await?;
            commands::run_prompt(&session, &question).await?;
        }
        Commands::Chat { inputs } => {
            let mut session = commands::build_session(&config).await?;
            commands::ingest(&mut session, &config, &inputs.files, inputs.dir.as_deref()).await?;
            let stdin = std::io::stdin();
            commands::run_chat(&mut session, stdin.lock(), std::io::stdout()).await?;
        }
    }

    Ok(())
}
