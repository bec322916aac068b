use std::sync::Arc;

use anyhow::bail;

use crate::database::{IndexEntry, VectorIndex};
use crate::document::ChunkRecord;
use crate::llm::Embedder;

use super::IngestError;

/// Tuning knobs for an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Records embedded and inserted per backend call.
    pub batch_size: usize,
    /// Retry granularity after a batch fails.
    pub mini_batch_size: usize,
    /// Fixed probe used for the post-ingestion smoke query.
    pub probe_query: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            mini_batch_size: 10,
            probe_query: "sea level rise".to_string(),
        }
    }
}

/// A chunk excluded from the index for this run, with the failure that
/// caused it.
#[derive(Debug, Clone)]
pub struct DroppedChunk {
    pub source: String,
    pub page: u32,
    pub batch: usize,
    pub reason: String,
}

/// Outcome of a successful (possibly partial) ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub inserted: usize,
    pub batches: usize,
    pub dropped: Vec<DroppedChunk>,
}

/// Index write lifecycle: the collection is created lazily by the first
/// batch whose embed + insert both succeed, and only appended to afterwards.
enum IndexState {
    Uninitialized,
    Open { vector_size: u64 },
}

/// Batch embedding ingestor.
///
/// Partitions chunk records into contiguous batches, embeds each batch and
/// writes it to the vector index strictly in order. A failing batch is
/// retried once as fixed-size mini-batches; a failing mini-batch is dropped
/// and its records reported. If nothing ever succeeds the run fails with
/// [`IngestError::NoIndexProduced`] and leaves nothing behind: a collection
/// created ahead of an insert that then failed is removed again.
pub struct Ingestor {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    options: IngestOptions,
}

impl Ingestor {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            options: IngestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IngestOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, records: Vec<ChunkRecord>) -> Result<IngestReport, IngestError> {
        let batch_size = self.options.batch_size.max(1);
        let mini_size = self.options.mini_batch_size.max(1);
        let total_batches = records.len().div_ceil(batch_size);

        println!(
            "Embedding {} chunks in batches of {}...",
            records.len(),
            batch_size
        );

        let mut state = IndexState::Uninitialized;
        let mut created = false;
        let mut report = IngestReport::default();

        for (i, batch) in records.chunks(batch_size).enumerate() {
            let batch_no = i + 1;
            report.batches += 1;
            println!(
                "  batch {}/{} ({} chunks)...",
                batch_no,
                total_batches,
                batch.len()
            );

            match self.write_batch(batch, &mut state, &mut created).await {
                Ok(()) => {
                    report.inserted += batch.len();
                    println!("  batch {} completed", batch_no);
                }
                Err(err) => {
                    log::warn!(
                        "batch {} failed ({}); retrying in mini-batches of {}",
                        batch_no,
                        err,
                        mini_size
                    );
                    for (j, mini) in batch.chunks(mini_size).enumerate() {
                        match self.write_batch(mini, &mut state, &mut created).await {
                            Ok(()) => {
                                report.inserted += mini.len();
                                println!("    mini-batch {} completed", j + 1);
                            }
                            Err(err) => {
                                log::warn!(
                                    "mini-batch {} of batch {} dropped ({} chunks): {}",
                                    j + 1,
                                    batch_no,
                                    mini.len(),
                                    err
                                );
                                for record in mini {
                                    report.dropped.push(DroppedChunk {
                                        source: record.metadata.source.clone(),
                                        page: record.metadata.page,
                                        batch: batch_no,
                                        reason: err.to_string(),
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }

        match state {
            IndexState::Uninitialized => {
                // The collection may have been created ahead of an insert
                // that then failed; remove it so a fully failed run
                // performs no lasting writes.
                if created {
                    if let Err(err) = self.index.destroy().await {
                        log::warn!("failed to remove empty collection: {}", err);
                    }
                }
                Err(IngestError::NoIndexProduced)
            }
            IndexState::Open { .. } => {
                self.smoke_test().await;
                Ok(report)
            }
        }
    }

    /// Embeds one batch and writes it to the index. The collection is
    /// created on the first call that gets embeddings back (recorded in
    /// `created`); the state moves to `Open` only once the insert has also
    /// succeeded. Once open, every later batch must match the collection's
    /// vector size.
    async fn write_batch(
        &self,
        records: &[ChunkRecord],
        state: &mut IndexState,
        created: &mut bool,
    ) -> anyhow::Result<()> {
        let texts: Vec<String> = records.iter().map(|r| r.page_content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != records.len() {
            bail!(
                "embedding backend returned {} vectors for {} texts",
                embeddings.len(),
                records.len()
            );
        }

        let vector_size = match *state {
            IndexState::Open { vector_size } => {
                if let Some(bad) = embeddings.iter().find(|e| e.len() as u64 != vector_size) {
                    bail!(
                        "embedding dimension {} does not match index dimension {}",
                        bad.len(),
                        vector_size
                    );
                }
                vector_size
            }
            IndexState::Uninitialized => {
                let size = embeddings.first().map_or(0, |e| e.len()) as u64;
                if let Some(bad) = embeddings.iter().find(|e| e.len() as u64 != size) {
                    bail!(
                        "embedding dimension {} does not match index dimension {}",
                        bad.len(),
                        size
                    );
                }
                self.index.initialize(size).await?;
                *created = true;
                size
            }
        };

        let entries = records
            .iter()
            .zip(embeddings)
            .map(|(record, embedding)| IndexEntry {
                embedding,
                text: record.page_content.clone(),
                source: record.metadata.source.clone(),
                page: record.metadata.page,
            })
            .collect();

        self.index.insert(entries).await?;
        *state = IndexState::Open { vector_size };
        Ok(())
    }

    /// Diagnostic only: one fixed similarity query against the populated
    /// index, logging the result count and a preview of the top hit. Never
    /// affects the run's outcome.
    async fn smoke_test(&self) {
        let probe = &self.options.probe_query;
        let embedding = match self.embedder.embed(probe).await {
            Ok(embedding) => embedding,
            Err(err) => {
                log::warn!("smoke test embedding failed: {}", err);
                return;
            }
        };

        match self.index.search(embedding, 3).await {
            Ok(hits) => {
                println!("Smoke test query '{}': {} result(s)", probe, hits.len());
                if let Some(top) = hits.first() {
                    let preview: String = top.text.chars().take(300).collect();
                    println!(
                        "  top hit: {} (page {}): {}...",
                        top.source,
                        top.page.map_or_else(|| "N/A".to_string(), |p| p.to_string()),
                        preview
                    );
                } else {
                    log::warn!("smoke test returned no results");
                }
            }
            Err(err) => {
                log::warn!("smoke test query failed: {}", err);
            }
        }
    }
}
