use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::document::{split_and_save, TextSplitter};

/// Converts every PDF in `data_dir` into a chunk container file under
/// `chunks_dir`.
pub fn run(data_dir: &Path, chunks_dir: &Path) -> Result<()> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("failed to read {}", data_dir.display()))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
        {
            pdfs.push(path);
        }
    }

    if pdfs.is_empty() {
        println!(
            "{}",
            format!("No PDF files found in {}", data_dir.display()).yellow()
        );
        return Ok(());
    }

    println!("Processing {} PDF file(s)...", pdfs.len());

    let pb = ProgressBar::new(pdfs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap(),
    );

    let splitter = TextSplitter::default();
    for pdf in &pdfs {
        pb.set_message(format!("{}", pdf.display()));
        let (out_path, chunk_count) = split_and_save(pdf, chunks_dir, &splitter)?;
        pb.println(format!(
            "Saved {} ({} chunks)",
            out_path.display().to_string().bright_green(),
            chunk_count
        ));
        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(())
}
