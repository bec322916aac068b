use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Text embedding backend.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, returning one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow!("embedding backend returned no vectors"))
    }
}

/// Chat completion backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
