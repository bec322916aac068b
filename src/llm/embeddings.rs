use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::traits::Embedder;

/// Embedding client for Ollama's `/api/embed` endpoint.
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!(
                "embedding request failed: status {}, body: {}",
                status,
                error_text
            ));
        }

        let response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(anyhow!("embedding API returned error: {}", error));
        }

        let embeddings: Vec<Vec<f32>> = response_json
            .get("embeddings")
            .cloned()
            .ok_or_else(|| anyhow!("embedding response has no 'embeddings' field"))
            .and_then(|v| serde_json::from_value(v).map_err(|e| anyhow!(e)))?;

        if embeddings.len() != texts.len() {
            return Err(anyhow!(
                "embedding backend returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            ));
        }

        Ok(embeddings)
    }
}
