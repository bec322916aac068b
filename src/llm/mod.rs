mod chat;
mod embeddings;
mod rag;
pub mod traits;

pub use chat::OllamaChat;
pub use embeddings::OllamaEmbedder;
pub use rag::{RagAnswer, RagChain, SourceRef};
pub use traits::{ChatModel, Embedder};
