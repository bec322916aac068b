use std::env;

/// Runtime configuration collected from the environment (with `.env` support
/// loaded in `main`). Every field has a default suitable for a local
/// Ollama + Qdrant setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub temperature: f32,
    pub qdrant_url: String,
    pub collection: String,
    pub dont_know: String,
}

impl Config {
    pub fn from_env() -> Self {
        let ollama_url = env::var("OLLAMA_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let embed_model = env::var("EMBED_MODEL")
            .unwrap_or_else(|_| "nomic-embed-text:latest".to_string());

        let chat_model = env::var("CHAT_MODEL")
            .unwrap_or_else(|_| "llama3.2:1b".to_string());

        let temperature = env::var("CHAT_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.0);

        let qdrant_url = env::var("QDRANT_URL")
            .unwrap_or_else(|_| "http://localhost:6333".to_string());

        let collection = env::var("COLLECTION")
            .unwrap_or_else(|_| "rag_chunks".to_string());

        let dont_know = env::var("DONT_KNOW")
            .unwrap_or_else(|_| "I don't know.".to_string());

        Self {
            ollama_url,
            embed_model,
            chat_model,
            temperature,
            qdrant_url,
            collection,
            dont_know,
        }
    }
}
