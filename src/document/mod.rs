mod processor;
mod splitter;

pub use processor::{pdf_to_pages, split_and_save, PageText};
pub use splitter::TextSplitter;

use serde::{Deserialize, Serialize};

/// Provenance metadata attached to every chunk: the source document's file
/// name and the 1-based page the text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub page: u32,
}

/// One chunk of document text plus its provenance. This is the record format
/// of the chunk container files: each `chunks/<doc>.json` holds an ordered
/// array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub page_content: String,
    pub metadata: ChunkMetadata,
}
