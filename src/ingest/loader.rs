use std::fs;
use std::path::Path;

use crate::document::ChunkRecord;

use super::IngestError;

/// Loads every chunk container file (`*.json`) in `dir` and concatenates
/// their records in directory-enumeration order.
///
/// The order across files is whatever the filesystem yields and is not
/// guaranteed stable between runs. A directory with no eligible files is an
/// error, and a single malformed file aborts the whole load.
pub fn load_chunk_records(dir: &Path) -> Result<Vec<ChunkRecord>, IngestError> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::ReadDir {
        dir: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::ReadDir {
            dir: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(IngestError::NoChunkFiles(dir.display().to_string()));
    }

    let mut records = Vec::new();
    for file in &files {
        let contents = fs::read_to_string(file).map_err(|source| IngestError::FileRead {
            file: file.display().to_string(),
            source,
        })?;
        let parsed: Vec<ChunkRecord> =
            serde_json::from_str(&contents).map_err(|source| IngestError::MalformedFile {
                file: file.display().to_string(),
                source,
            })?;
        log::info!("loaded {} chunks from {}", parsed.len(), file.display());
        records.extend(parsed);
    }

    Ok(records)
}
