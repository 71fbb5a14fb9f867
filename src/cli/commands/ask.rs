use anyhow::{Context, Result};
use clap::Args;
use std::time::Instant;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::RagService;

#[derive(Debug, Args)]
pub struct AskArgs {
    #[arg(required = true, help = "Question to answer from the indexed documents")]
    pub question: String,

    #[arg(long, short = 'k', help = "Number of passages to retrieve")]
    pub top_k: Option<u32>,
}

pub async fn handle_ask(args: AskArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let question = args.question.trim();
    if question.is_empty() {
        anyhow::bail!("question cannot be empty");
    }

    let config = Config::load()?;
    let formatter = get_formatter(format);

    let top_k = args.top_k.unwrap_or(config.chat.top_k);
    if top_k == 0 {
        anyhow::bail!("top-k must be at least 1");
    }

    if verbose {
        eprintln!("Question: \"{question}\"");
        eprintln!("  Top-k: {top_k}");
        eprintln!("  Model: {}", config.provider.generation_model);
    }

    let service = RagService::from_config(&config)?;
    service
        .initialize()
        .await
        .context("failed to initialize vector index")?;

    let start = Instant::now();
    let answer = service.query(question, top_k as usize).await?;

    if verbose {
        eprintln!("Answered in {}ms", start.elapsed().as_millis());
    }

    println!("{}", formatter.format_answer(&answer));
    Ok(())
}
