use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::database::VectorIndex;

use super::traits::{ChatModel, Embedder};

/// Provenance of one retrieved chunk, as returned to API clients. `page` is
/// the page number as a string, or `"N/A"` when the entry has none.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub source: String,
    pub page: String,
}

#[derive(Debug, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Retrieval-augmented answer chain: embed the question, fetch the top-k
/// most similar chunks, and prompt the chat model with them as context.
pub struct RagChain {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatModel>,
    top_k: u64,
    dont_know: String,
}

impl RagChain {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            chat,
            top_k: 4,
            dont_know: "I don't know.".to_string(),
        }
    }

    pub fn with_top_k(mut self, top_k: u64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_fallback(mut self, dont_know: impl Into<String>) -> Self {
        self.dont_know = dont_know.into();
        self
    }

    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        let query_embedding = self.embedder.embed(question).await?;
        let hits = self.index.search(query_embedding, self.top_k).await?;

        // Nothing retrieved: short-circuit to the fallback instead of asking
        // the model to answer from an empty context.
        if hits.is_empty() {
            return Ok(RagAnswer {
                answer: self.dont_know.clone(),
                sources: Vec::new(),
            });
        }

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = build_prompt(&context, question, &self.dont_know);
        let answer = self.chat.complete(&prompt).await?;

        let sources = hits
            .iter()
            .map(|hit| SourceRef {
                source: hit.source.clone(),
                page: hit
                    .page
                    .map_or_else(|| "N/A".to_string(), |p| p.to_string()),
            })
            .collect();

        Ok(RagAnswer { answer, sources })
    }
}

fn build_prompt(context: &str, question: &str, dont_know: &str) -> String {
    format!(
        "Use the following context to answer the question. \n\
         If the answer is not in the context, say '{}'\n\n\
         Context:\n{}\n\nQuestion: {}\n\nAnswer:",
        dont_know, context, question
    )
}
