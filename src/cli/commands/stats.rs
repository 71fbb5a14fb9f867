use anyhow::{Context, Result};

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::create_backend;

pub async fn handle_stats(format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    if verbose {
        eprintln!(
            "Vector store: {} at {} ({})",
            config.vector_store.driver, config.vector_store.url, config.vector_store.collection
        );
    }

    let store = create_backend(&config.vector_store, config.embedding.dimension)?;
    let stats = store
        .stats()
        .await
        .context("failed to fetch index statistics")?;

    println!("{}", formatter.format_index_stats(&stats));
    Ok(())
}
