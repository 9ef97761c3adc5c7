//! docchat CLI - HTTP server plus tools for poking at the retrieval pipeline
//!
//! # Commands
//!
//! ```bash
//! # Serve /predict, /reload-docs and /health
//! docchat serve --config docchat.toml
//!
//! # Chunk a document and show results
//! docchat chunk --size 1000 --overlap 200 input.txt
//!
//! # Embed text and show vector stats
//! docchat embed "What is Spring Boot?"
//!
//! # Ingest the configured corpus and search it
//! docchat query "What is Spring Boot?" -k 3
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docchat_lib::{
    chunk::{ChunkMetadata, Chunker, FixedSizeChunker},
    config::Settings,
    embed,
    engine::{EngineState, RetrievalEngine},
    llm::OllamaClient,
    server::{self, AppState},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Chat backend that answers from a local document corpus")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ./docchat.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,

    /// Chunk a document with the fixed-size chunker
    Chunk {
        /// Input file to chunk
        input: PathBuf,

        /// Chunk size in chars
        #[arg(long, default_value = "1000")]
        size: usize,

        /// Chars shared between consecutive chunks
        #[arg(long, default_value = "200")]
        overlap: usize,
    },

    /// Embed text with the configured embedder and show vector info
    Embed {
        /// Text to embed
        text: String,

        /// Treat as query
        #[arg(short, long)]
        query: bool,
    },

    /// Ingest the configured corpus and search it
    Query {
        /// Query to search for
        query: String,

        /// Number of results to return
        #[arg(short, long)]
        k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    match cli.command {
        Commands::Serve => {
            let engine_settings = settings.clone();
            let engine = tokio::task::spawn_blocking(move || RetrievalEngine::from_settings(&engine_settings))
                .await??;
            tracing::info!(
                "Engine {} with {} chunks from {}",
                engine.state(),
                engine.len(),
                engine.corpus_dir().display()
            );

            let chat = OllamaClient::from_settings(&settings.llm)?;
            tracing::info!("Using model {} at {}", chat.model(), settings.llm.base_url);

            let state = AppState::new(Arc::new(engine), Arc::new(chat), settings.retrieval.top_k);
            let listener = TcpListener::bind(settings.bind_addr())
                .await
                .with_context(|| format!("binding {}", settings.bind_addr()))?;
            server::serve(listener, state).await?;
        }

        Commands::Chunk { input, size, overlap } => {
            let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let chunker = FixedSizeChunker::new(size, overlap)?;
            let chunks = chunker.chunk(&text, ChunkMetadata::default());

            println!("Chunked '{}' into {} chunks:\n", input.display(), chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                let chars = chunk.content.chars().count();
                println!("--- Chunk {} ({} chars, id: {}) ---", i + 1, chars, chunk.id);
                let preview: String = chunk.content.chars().take(200).collect();
                println!("{}{}\n", preview, if chars > 200 { "..." } else { "" });
            }
        }

        Commands::Embed { text, query } => {
            let embedder = embed::from_settings(&settings.embedding)?;
            println!("Using {} ({} dims)", embedder.model_name(), embedder.dimension());

            let embedding = if query {
                println!("Embedding as query: {}", text);
                embedder.embed_query(&text)?
            } else {
                println!("Embedding as document: {}", text);
                embedder
                    .embed_documents(&[text.as_str()])?
                    .into_iter()
                    .next()
                    .context("embedder returned no vectors")?
            };

            println!("\nEmbedding stats:");
            println!("  Dimensions: {}", embedding.len());
            println!("  First 5 values: {:?}", &embedding[..embedding.len().min(5)]);
            println!("  Min: {:.4}", embedding.iter().cloned().fold(f32::INFINITY, f32::min));
            println!("  Max: {:.4}", embedding.iter().cloned().fold(f32::NEG_INFINITY, f32::max));
        }

        Commands::Query { query, k } => {
            let k = k.unwrap_or(settings.retrieval.top_k);
            let engine = RetrievalEngine::from_settings(&settings)?;
            if engine.state() != EngineState::Ready {
                println!("No documents indexed under {}", engine.corpus_dir().display());
                return Ok(());
            }
            println!(
                "Index contains {} chunks embedded with {}",
                engine.len(),
                engine.embedder().model_name()
            );

            println!("\nSearching: '{query}' (k={k})");
            let results = engine.search(&query, k)?;

            println!("\n=== Results ===\n");
            for (i, result) in results.iter().enumerate() {
                let source = result.chunk.metadata.source_id.as_deref().unwrap_or("?");
                match result.chunk.metadata.page {
                    Some(page) => println!("#{} (score: {:.4}) {} p.{}", i + 1, result.score, source, page),
                    None => println!("#{} (score: {:.4}) {}", i + 1, result.score, source),
                }
                println!("---");
                let preview: String = result.chunk.content.chars().take(300).collect();
                let ellipsis = if result.chunk.content.chars().count() > 300 { "..." } else { "" };
                println!("{preview}{ellipsis}\n");
            }
        }
    }

    Ok(())
}
