//! `vecsql` loads documents into a vector-capable SQL store and searches
//! them by semantic similarity.
//!
//! Configuration comes from the environment (a `.env` file is honored):
//! `VECSQL_DB`, `VECSQL_PROVIDER`, `VECSQL_STORE`, `VECSQL_COLLECTION`,
//! `OPENAI_URL`, `OPENAI_KEY`, `OPENAI_DEPLOYMENT_NAME`,
//! `EMBEDDING_DIMENSIONS`. Missing required values abort with a message;
//! any other failure propagates. There is no retry policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use vecsql_engine::{EngineConfig, SearchEngine};
use vecsql_store::{DistanceMetric, DocumentInput};

#[derive(Parser, Debug)]
#[command(name = "vecsql")]
#[command(about = "Store and query text embeddings in a vector-capable SQL engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy the database schema and create the target collection.
    Init,
    /// Embed documents from a JSON content file and upsert them.
    Load {
        /// JSON array of { "title": ..., "content": ... } records.
        file: PathBuf,

        /// Use the bulk-load path (faster, all-or-nothing, no upsert).
        #[arg(long)]
        bulk: bool,
    },
    /// Find the records nearest to a search phrase.
    Search {
        /// Phrase to embed and search with.
        phrase: String,

        /// Number of results to return.
        #[arg(short, long, default_value_t = 5)]
        k: usize,

        /// Distance metric to rank by.
        #[arg(long, value_enum, default_value_t = Metric::Cosine)]
        metric: Metric,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Metric {
    Cosine,
    L2,
}

impl From<Metric> for DistanceMetric {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Cosine => DistanceMetric::Cosine,
            Metric::L2 => DistanceMetric::L2,
        }
    }
}

/// One record of the content file, matching the original sample data shape.
#[derive(Debug, Deserialize)]
struct ContentRecord {
    title: String,
    content: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;
    let engine = SearchEngine::from_config(&config)?;

    match cli.command {
        Command::Init => {
            engine.store().deploy()?;
            engine.store().get_or_create_collection(engine.collection())?;
            println!("Schema deployed; collection '{}' ready.", engine.collection());
        }
        Command::Load { file, bulk } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let records: Vec<ContentRecord> =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
            let documents: Vec<DocumentInput> = records
                .into_iter()
                .map(|r| DocumentInput::new(r.title, r.content))
                .collect();

            if bulk {
                let written = engine.ingest_bulk(documents).await?;
                println!("Bulk-loaded {written} documents.");
            } else {
                let ids = engine.ingest(documents).await?;
                println!("Upserted {} documents.", ids.len());
            }
        }
        Command::Search { phrase, k, metric } => {
            println!("Search phrase is: '{phrase}'");
            let results = engine.search(&phrase, k, metric.into()).await?;
            if results.is_empty() {
                println!("No matching documents.");
            }
            for result in results {
                println!("{} (distance: {:.4})", result.title, result.distance);
            }
        }
    }

    Ok(())
}
