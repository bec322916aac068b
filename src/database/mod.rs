mod qdrant;
mod vector_db;

pub use qdrant::create_qdrant_client;
pub use vector_db::{IndexEntry, ScoredEntry, VectorDb, VectorDbError, VectorIndex};
