pub mod api;
pub mod commands;
pub mod config;
pub mod database;
pub mod document;
pub mod ingest;
pub mod llm;

// Re-export commonly used items
pub use config::Config;
pub use document::{ChunkMetadata, ChunkRecord};
pub use ingest::{IngestReport, Ingestor};
pub use llm::RagChain;
