mod ingestor;
mod loader;

pub use ingestor::{DroppedChunk, IngestOptions, IngestReport, Ingestor};
pub use loader::load_chunk_records;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read chunk directory {dir}: {source}")]
    ReadDir {
        dir: String,
        source: std::io::Error,
    },
    #[error("no chunk files found in {0}")]
    NoChunkFiles(String),
    #[error("failed to read chunk file {file}: {source}")]
    FileRead {
        file: String,
        source: std::io::Error,
    },
    #[error("malformed chunk file {file}: {source}")]
    MalformedFile {
        file: String,
        source: serde_json::Error,
    },
    #[error("every batch failed, no index produced")]
    NoIndexProduced,
}
