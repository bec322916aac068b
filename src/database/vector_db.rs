use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, with_payload_selector::SelectorOptions, CountPoints,
        CreateCollection, DeleteCollection, Distance, PointId, PointStruct, SearchPoints,
        UpsertPoints, Value, VectorParams, VectorsConfig, WithPayloadSelector,
    },
    Qdrant,
};
use thiserror::Error;
use uuid::Uuid;

use super::create_qdrant_client;

#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("operation failed: {0}")]
    Operation(String),
}

/// One embedded chunk headed for the index.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub embedding: Vec<f32>,
    pub text: String,
    pub source: String,
    pub page: u32,
}

/// A similarity search hit. `page` is optional because older entries may
/// predate the page payload field.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub text: String,
    pub source: String,
    pub page: Option<u32>,
    pub score: f32,
}

/// Persistent vector index: incremental insertion plus nearest-neighbor
/// search. Implemented by the Qdrant wrapper below and by in-memory fakes
/// in tests.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Creates the backing collection for vectors of `vector_size`
    /// dimensions. Idempotent: an existing collection is left alone.
    async fn initialize(&self, vector_size: u64) -> Result<(), VectorDbError>;

    /// Appends entries. Every call inserts fresh points; re-ingesting the
    /// same chunks produces duplicates by design.
    async fn insert(&self, entries: Vec<IndexEntry>) -> Result<(), VectorDbError>;

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredEntry>, VectorDbError>;

    async fn count(&self) -> Result<u64, VectorDbError>;

    /// Removes the backing collection. Used by ingestion to tear down a
    /// collection it created when no insert ever succeeded.
    async fn destroy(&self) -> Result<(), VectorDbError>;
}

/// Qdrant-backed vector index scoped to a single collection.
#[derive(Clone)]
pub struct VectorDb {
    client: Arc<Qdrant>,
    collection: String,
}

impl VectorDb {
    pub async fn connect(url: &str, collection: &str) -> Result<Self, VectorDbError> {
        let client = create_qdrant_client(url).await?;
        Ok(Self {
            client: Arc::new(client),
            collection: collection.to_string(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorIndex for VectorDb {
    async fn initialize(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let vectors_config = VectorsConfig {
            config: Some(qdrant_client::qdrant::vectors_config::Config::Params(
                VectorParams {
                    size: vector_size,
                    distance: Distance::Cosine.into(),
                    ..Default::default()
                },
            )),
        };

        let create_collection = CreateCollection {
            collection_name: self.collection.clone(),
            vectors_config: Some(vectors_config),
            ..Default::default()
        };

        match self.client.create_collection(create_collection).await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("AlreadyExists") => {
                log::info!(
                    "collection {} already exists, appending to it",
                    self.collection
                );
                Ok(())
            }
            Err(e) => Err(VectorDbError::Operation(e.to_string())),
        }
    }

    async fn insert(&self, entries: Vec<IndexEntry>) -> Result<(), VectorDbError> {
        if entries.is_empty() {
            return Ok(());
        }

        let points = entries
            .into_iter()
            .map(|entry| {
                let payload: HashMap<String, serde_json::Value> = HashMap::from([
                    ("text".to_string(), serde_json::Value::from(entry.text)),
                    ("source".to_string(), serde_json::Value::from(entry.source)),
                    ("page".to_string(), serde_json::Value::from(entry.page)),
                ]);
                let payload: HashMap<String, Value> = payload
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect();

                PointStruct {
                    id: Some(PointId {
                        point_id_options: Some(PointIdOptions::Uuid(
                            Uuid::new_v4().to_string(),
                        )),
                    }),
                    vectors: Some(entry.embedding.into()),
                    payload,
                }
            })
            .collect();

        let upsert_points = UpsertPoints {
            collection_name: self.collection.clone(),
            points,
            ..Default::default()
        };

        self.client
            .upsert_points(upsert_points)
            .await
            .map_err(|e| VectorDbError::Operation(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredEntry>, VectorDbError> {
        let request = SearchPoints {
            collection_name: self.collection.clone(),
            vector: embedding,
            limit,
            with_payload: Some(WithPayloadSelector {
                selector_options: Some(SelectorOptions::Enable(true)),
            }),
            ..Default::default()
        };

        let results = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorDbError::Operation(e.to_string()))?;

        let entries = results
            .result
            .into_iter()
            .filter_map(|point| {
                let score = point.score;
                let payload: HashMap<String, serde_json::Value> = point
                    .payload
                    .into_iter()
                    .map(|(k, v)| {
                        let v = serde_json::Value::try_from(v).unwrap_or(serde_json::Value::Null);
                        (k, v)
                    })
                    .collect();

                let text = payload.get("text")?.as_str()?.to_string();
                let source = payload
                    .get("source")
                    .and_then(|s| s.as_str())
                    .unwrap_or("Unknown")
                    .to_string();
                let page = payload
                    .get("page")
                    .and_then(|p| p.as_u64())
                    .map(|p| p as u32);

                Some(ScoredEntry {
                    text,
                    source,
                    page,
                    score,
                })
            })
            .collect();

        Ok(entries)
    }

    async fn count(&self) -> Result<u64, VectorDbError> {
        let request = CountPoints {
            collection_name: self.collection.clone(),
            exact: Some(true),
            ..Default::default()
        };

        let response = self
            .client
            .count(request)
            .await
            .map_err(|e| VectorDbError::Operation(e.to_string()))?;

        Ok(response.result.map_or(0, |r| r.count))
    }

    async fn destroy(&self) -> Result<(), VectorDbError> {
        let request = DeleteCollection {
            collection_name: self.collection.clone(),
            ..Default::default()
        };

        self.client
            .delete_collection(request)
            .await
            .map_err(|e| VectorDbError::Operation(e.to_string()))?;

        log::info!("collection {} removed", self.collection);
        Ok(())
    }
}
