use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::database::{VectorDb, VectorIndex};
use crate::ingest::{load_chunk_records, IngestOptions, IngestReport, Ingestor};
use crate::llm::OllamaEmbedder;

/// Loads chunk records from `chunks_dir` and embeds them into the configured
/// Qdrant collection. Returns the ingestion report.
pub async fn run(config: &Config, chunks_dir: &Path, batch_size: usize) -> Result<IngestReport> {
    println!("Starting embedding process...");

    let records = load_chunk_records(chunks_dir)?;
    println!("Total documents loaded: {}", records.len());

    let embedder = Arc::new(OllamaEmbedder::new(
        config.ollama_url.clone(),
        config.embed_model.clone(),
    ));
    let index: Arc<dyn VectorIndex> =
        Arc::new(VectorDb::connect(&config.qdrant_url, &config.collection).await?);

    let ingestor = Ingestor::new(embedder, index).with_options(IngestOptions {
        batch_size,
        ..Default::default()
    });

    let report = ingestor.run(records).await?;

    println!(
        "\n{}",
        format!(
            "Successfully stored {} vectors in collection '{}'",
            report.inserted, config.collection
        )
        .bright_green()
    );

    if !report.dropped.is_empty() {
        println!(
            "{}",
            format!("{} chunk(s) were dropped:", report.dropped.len()).yellow()
        );
        for drop in &report.dropped {
            println!(
                "  {} page {} (batch {}): {}",
                drop.source, drop.page, drop.batch, drop.reason
            );
        }
    }

    Ok(report)
}
