#![allow(dead_code)]

//! Deterministic fakes shared by the integration tests: an embedding backend
//! with scriptable failures and an in-memory vector index.

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use pdf_rag::database::{IndexEntry, ScoredEntry, VectorDbError, VectorIndex};
use pdf_rag::document::{ChunkMetadata, ChunkRecord};
use pdf_rag::llm::Embedder;

pub const DIM: usize = 4;

/// Embedding backend that returns a deterministic vector per text. A batch
/// fails when any of its texts contains the poison marker, or always when
/// `always_fail` is set. Texts containing the `truncate` marker get a vector
/// one element short. Every call's batch size is recorded.
pub struct MockEmbedder {
    pub calls: Mutex<Vec<usize>>,
    poison: Option<String>,
    truncate: Option<String>,
    always_fail: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            poison: None,
            truncate: None,
            always_fail: false,
        }
    }

    pub fn poisoned(marker: impl Into<String>) -> Self {
        Self {
            poison: Some(marker.into()),
            ..Self::new()
        }
    }

    pub fn truncating(marker: impl Into<String>) -> Self {
        Self {
            truncate: Some(marker.into()),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::new()
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIM];
    for (i, byte) in text.bytes().enumerate() {
        vector[i % DIM] += byte as f32;
    }
    vector
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.lock().unwrap().push(texts.len());

        if self.always_fail {
            bail!("embedding backend unavailable");
        }
        if let Some(marker) = &self.poison {
            if texts.iter().any(|t| t.contains(marker.as_str())) {
                bail!("embedding backend rejected batch");
            }
        }

        Ok(texts
            .iter()
            .map(|t| {
                let mut vector = embed_text(t);
                if let Some(marker) = &self.truncate {
                    if t.contains(marker.as_str()) {
                        vector.pop();
                    }
                }
                vector
            })
            .collect())
    }
}

/// In-memory stand-in for the Qdrant-backed index.
pub struct MemoryIndex {
    pub vector_size: Mutex<Option<u64>>,
    pub entries: Mutex<Vec<IndexEntry>>,
    fail_inserts: bool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            vector_size: Mutex::new(None),
            entries: Mutex::new(Vec::new()),
            fail_inserts: false,
        }
    }

    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::new()
        }
    }

    pub fn stored(&self) -> Vec<IndexEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.vector_size.lock().unwrap().is_some()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn initialize(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let mut size = self.vector_size.lock().unwrap();
        if size.is_none() {
            *size = Some(vector_size);
        }
        Ok(())
    }

    async fn insert(&self, entries: Vec<IndexEntry>) -> Result<(), VectorDbError> {
        if self.fail_inserts {
            return Err(VectorDbError::Operation("insert refused".to_string()));
        }
        self.entries.lock().unwrap().extend(entries);
        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredEntry>, VectorDbError> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|entry| {
                let score = entry
                    .embedding
                    .iter()
                    .zip(&embedding)
                    .map(|(a, b)| a * b)
                    .sum();
                ScoredEntry {
                    text: entry.text.clone(),
                    source: entry.source.clone(),
                    page: Some(entry.page),
                    score,
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit as usize);
        Ok(scored)
    }

    async fn count(&self) -> Result<u64, VectorDbError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    async fn destroy(&self) -> Result<(), VectorDbError> {
        *self.vector_size.lock().unwrap() = None;
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

pub fn make_records(count: usize) -> Vec<ChunkRecord> {
    (0..count)
        .map(|i| ChunkRecord {
            page_content: format!("chunk number {} about climate science", i),
            metadata: ChunkMetadata {
                source: "report.pdf".to_string(),
                page: (i / 3 + 1) as u32,
            },
        })
        .collect()
}
