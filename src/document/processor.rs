use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{ChunkMetadata, ChunkRecord, TextSplitter};

/// Text extracted from one PDF page. Pages are numbered from 1; pages whose
/// extraction produced only whitespace are omitted.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

/// Extracts per-page text from a PDF file.
///
/// Extraction degrades instead of failing: if per-page extraction errors,
/// the whole document is extracted as a single page 1; if that fails too,
/// the file is skipped with a warning and yields no pages. A bad file never
/// aborts a multi-file run.
pub fn pdf_to_pages(pdf_path: &Path) -> Result<Vec<PageText>> {
    let pages = match pdf_extract::extract_text_by_pages(pdf_path) {
        Ok(pages) => pages,
        Err(err) => {
            log::warn!(
                "per-page extraction failed for {}: {}; retrying whole-document",
                pdf_path.display(),
                err
            );
            match pdf_extract::extract_text(pdf_path) {
                Ok(text) => vec![text],
                Err(err) => {
                    log::warn!("skipping {}: {}", pdf_path.display(), err);
                    return Ok(Vec::new());
                }
            }
        }
    };

    let pages = pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| PageText {
            page: (i + 1) as u32,
            text,
        })
        .collect();

    Ok(pages)
}

/// Splits a PDF into chunk records and writes them to
/// `<out_dir>/<basename>.json` as an ordered JSON array of
/// `{page_content, metadata: {source, page}}` records.
///
/// Returns the container path and the number of chunks written.
pub fn split_and_save(
    pdf_path: &Path,
    out_dir: &Path,
    splitter: &TextSplitter,
) -> Result<(PathBuf, usize)> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let base = pdf_path
        .file_name()
        .with_context(|| format!("{} has no file name", pdf_path.display()))?
        .to_string_lossy()
        .to_string();

    let pages = pdf_to_pages(pdf_path)?;

    let mut records = Vec::new();
    for page in &pages {
        for chunk in splitter.split_text(&page.text) {
            records.push(ChunkRecord {
                page_content: chunk,
                metadata: ChunkMetadata {
                    source: base.clone(),
                    page: page.page,
                },
            });
        }
    }

    let out_path = out_dir.join(format!("{}.json", base));
    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    Ok((out_path, records.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_file_is_skipped_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.pdf");
        fs::write(&bad, b"not a pdf at all").unwrap();

        let pages = pdf_to_pages(&bad).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn unreadable_file_still_writes_an_empty_container() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.pdf");
        fs::write(&bad, b"not a pdf at all").unwrap();
        let out_dir = dir.path().join("chunks");

        let splitter = TextSplitter::new(1000, 200);
        let (path, count) = split_and_save(&bad, &out_dir, &splitter).unwrap();

        assert_eq!(count, 0);
        let written = fs::read_to_string(path).unwrap();
        let records: Vec<ChunkRecord> = serde_json::from_str(&written).unwrap();
        assert!(records.is_empty());
    }
}
