//! bioanno CLI
//!
//! Annotate curies against the live BioThings services or load an
//! adverse-event data folder from the terminal.

use anyhow::Context;
use bioanno_annotator::Annotator;
use bioanno_core::config::AppConfig;
use bioanno_core::NamespaceTable;
use bioanno_ingest::{DocumentStore, EventLoader, EventSchema};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bioanno", version, about = "Biomedical curie annotation toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a single curie id
    Annotate {
        /// Curie id, e.g. NCBIGene:1017
        curie: String,

        /// Print raw lookup records without transformation
        #[arg(long)]
        raw: bool,

        /// Comma-separated field list overriding the per-type defaults
        #[arg(long)]
        fields: Option<String>,
    },

    /// Load an adverse-event data folder and report what was stored
    Ingest {
        /// Folder of *.json dump files
        data_folder: PathBuf,

        /// Path to the drugevent YAML field schema
        #[arg(long)]
        schema: PathBuf,

        /// Skip documents larger than this many serialized bytes
        #[arg(long)]
        max_doc_bytes: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bioanno=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate { curie, raw, fields } => annotate(&curie, raw, fields).await,
        Commands::Ingest {
            data_folder,
            schema,
            max_doc_bytes,
        } => ingest(&data_folder, &schema, max_doc_bytes),
    }
}

async fn annotate(curie: &str, raw: bool, fields: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::from_env().unwrap_or_default();
    let table = Arc::new(NamespaceTable::biolink_defaults());
    let annotator = Annotator::from_config(&config.lookup, table)?;

    let fields: Option<Vec<String>> =
        fields.map(|f| f.split(',').map(|s| s.trim().to_string()).collect());
    let result = annotator
        .annotate_curie(curie, raw, fields.as_deref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn ingest(
    data_folder: &std::path::Path,
    schema_path: &std::path::Path,
    max_doc_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let schema = EventSchema::from_file(schema_path)
        .with_context(|| format!("loading schema from {}", schema_path.display()))?;
    tracing::info!(
        "schema loaded: {} int fields, {} categorical fields",
        schema.int_field_count(),
        schema.categorical_field_count()
    );

    let loader = EventLoader::new(schema);
    let mut store = match max_doc_bytes {
        Some(cap) => DocumentStore::new().with_size_cap(cap),
        None => DocumentStore::new(),
    };
    loader.load_folder(data_folder, &mut store)?;

    let stats = store.stats();
    println!("stored:           {}", store.len());
    println!("merged:           {}", stats.merged);
    println!("skipped oversize: {}", stats.skipped_oversize);
    Ok(())
}
