use anyhow::{Context, Result};
use clap::Args;
use tokio::io::BufReader;

use crate::cli::interactive::{InteractiveSession, State};
use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::RagService;

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[arg(long, short = 'k', help = "Number of passages to retrieve per question")]
    pub top_k: Option<u32>,
}

/// Start directly in chat mode.
pub async fn handle_chat(args: ChatArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    run_session(State::Chatting, args.top_k, format, verbose).await
}

/// The full menu, used when no subcommand is given.
pub async fn handle_interactive(format: OutputFormat, verbose: bool) -> Result<()> {
    run_session(State::Menu, None, format, verbose).await
}

async fn run_session(
    initial: State,
    top_k: Option<u32>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;

    let top_k = top_k.unwrap_or(config.chat.top_k);
    if top_k == 0 {
        anyhow::bail!("top-k must be at least 1");
    }

    println!("\n{}", "=".repeat(60));
    println!("  RAG CHATBOT - Gemini + {}", config.vector_store.driver);
    println!("{}\n", "=".repeat(60));

    if verbose {
        eprintln!("Collection: {}", config.vector_store.collection);
        eprintln!("Documents: {}", config.indexing.documents_path.display());
    }

    let service = RagService::from_config(&config)?;
    service
        .initialize()
        .await
        .context("failed to initialize vector index")?;
    println!("Chatbot ready!");

    let mut session = InteractiveSession::new(
        &service,
        get_formatter(format),
        config.indexing.documents_path.clone(),
        top_k as usize,
        config.chat.history_limit as usize,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    );
    session.run(initial).await
}
