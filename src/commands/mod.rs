pub mod embed;
pub mod ingest;
