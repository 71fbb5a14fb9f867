//! Index command implementation.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::output::get_formatter;
use crate::error::IndexError;
use crate::models::{Config, IndexReport, OutputFormat};
use crate::services::RagService;

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory with .txt and .pdf documents (defaults to indexing.documents_path)
    pub path: Option<PathBuf>,
}

pub async fn handle_index(args: IndexArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let path = args
        .path
        .unwrap_or_else(|| config.indexing.documents_path.clone());

    if verbose {
        eprintln!("Indexing: {}", path.display());
        eprintln!(
            "  Chunk size: {} (overlap {})",
            config.indexing.chunk_size, config.indexing.chunk_overlap
        );
        eprintln!(
            "  Vector store: {} ({})",
            config.vector_store.driver, config.vector_store.collection
        );
    }

    let service = RagService::from_config(&config)?;
    let report = index_with_progress(&service, &path).await?;
    println!("{}", formatter.format_index_report(&report));

    Ok(())
}

/// Index `path` behind a spinner on stderr.
pub async fn index_with_progress(
    service: &RagService,
    path: &Path,
) -> Result<IndexReport, IndexError> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Indexing {}", path.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = service.index_directory(path).await;
    pb.finish_and_clear();
    result
}
