//! Document Loader edge cases on temporary directories.

use std::fs;

use pdf_rag::document::{ChunkMetadata, ChunkRecord};
use pdf_rag::ingest::{load_chunk_records, IngestError};
use tempfile::tempdir;

fn record(text: &str, source: &str, page: u32) -> ChunkRecord {
    ChunkRecord {
        page_content: text.to_string(),
        metadata: ChunkMetadata {
            source: source.to_string(),
            page,
        },
    }
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = load_chunk_records(&missing).unwrap_err();
    assert!(matches!(err, IngestError::ReadDir { .. }));
}

#[test]
fn directory_without_chunk_files_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "not a chunk file").unwrap();

    let err = load_chunk_records(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::NoChunkFiles(_)));
}

#[test]
fn malformed_container_aborts_the_whole_load() {
    let dir = tempdir().unwrap();
    let good = vec![record("fine", "a.pdf", 1)];
    fs::write(
        dir.path().join("a.pdf.json"),
        serde_json::to_string(&good).unwrap(),
    )
    .unwrap();
    fs::write(dir.path().join("b.pdf.json"), "{ not json ]").unwrap();

    let err = load_chunk_records(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::MalformedFile { .. }));
}

#[test]
fn records_from_all_files_are_concatenated() {
    let dir = tempdir().unwrap();
    let first = vec![record("one", "a.pdf", 1), record("two", "a.pdf", 2)];
    let second = vec![record("three", "b.pdf", 1)];
    fs::write(
        dir.path().join("a.pdf.json"),
        serde_json::to_string(&first).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("b.pdf.json"),
        serde_json::to_string(&second).unwrap(),
    )
    .unwrap();

    let records = load_chunk_records(dir.path()).unwrap();
    assert_eq!(records.len(), 3);
    for expected in first.iter().chain(&second) {
        assert!(records.contains(expected));
    }

    // Within a file, record order is preserved.
    let pos_one = records.iter().position(|r| r.page_content == "one").unwrap();
    let pos_two = records.iter().position(|r| r.page_content == "two").unwrap();
    assert!(pos_one < pos_two);
}

#[test]
fn container_format_round_trips_the_original_field_names() {
    let json = r#"[
        {"page_content": "some text", "metadata": {"source": "doc.pdf", "page": 3}}
    ]"#;
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc.pdf.json"), json).unwrap();

    let records = load_chunk_records(dir.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page_content, "some text");
    assert_eq!(records[0].metadata.source, "doc.pdf");
    assert_eq!(records[0].metadata.page, 3);
}
