//! jobscrape: run one ingestion batch over a JSON file of submitted links.
//!
//! The links file is a JSON array of `{ "id", "originalUrl", "attemptsCount" }`
//! objects (`id` and `attemptsCount` are optional). Outcomes are written back to
//! an in-memory store and the batch report is printed as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

use jobscrape::web_scraper::ChromiumDriver;
use jobscrape::{
    IngestConfig, InMemoryLinkStore, LinkProcessor, LinkStore, LinkValidator, OpenAiGenerator,
    SubmittedLink, persist_report,
};

#[derive(Parser)]
#[command(name = "jobscrape", about = "Ingest submitted job-posting links")]
struct Cli {
    /// JSON array of submitted links
    links: PathBuf,

    /// JSON config file (defaults come from the environment)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process at most this many pending links
    #[arg(long)]
    limit: Option<usize>,
}

/// Links file entry. Missing ids are generated.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkEntry {
    id: Option<Uuid>,
    original_url: String,
    #[serde(default)]
    attempts_count: u32,
}

impl From<LinkEntry> for SubmittedLink {
    fn from(entry: LinkEntry) -> Self {
        SubmittedLink {
            id: entry.id.unwrap_or_else(Uuid::new_v4),
            original_url: entry.original_url,
            attempts_count: entry.attempts_count,
        }
    }
}

fn load_links(path: &PathBuf) -> Result<Vec<SubmittedLink>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read links file {}", path.display()))?;
    let entries: Vec<LinkEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Links file {} is not a JSON array of links", path.display()))?;
    Ok(entries.into_iter().map(SubmittedLink::from).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IngestConfig::from_json_file(path)?,
        None => IngestConfig::from_env()?,
    };

    let store = Arc::new(InMemoryLinkStore::with_links(load_links(&cli.links)?));
    let links = store.pending_links(cli.limit).await?;
    tracing::info!(count = links.len(), "Loaded pending links");

    let processor = LinkProcessor::from_config(
        &config,
        Arc::new(ChromiumDriver::new(config.scraper().clone())),
        Arc::new(OpenAiGenerator::from_config(&config)),
    )
    .with_validator(LinkValidator::new(config.validator()).with_store(store.clone()));

    let report = processor.process_links(&links).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    let written = persist_report(store.as_ref(), report).await?;
    tracing::info!(written, "Outcomes written back");
    Ok(())
}
