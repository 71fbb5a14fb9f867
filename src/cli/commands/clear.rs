use anyhow::Result;
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::create_backend;

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn handle_clear(args: ClearArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    if verbose {
        println!("Clearing collection '{}'...", config.vector_store.collection);
    }

    if !args.yes {
        println!("This will delete ALL indexed vectors. Continue? [y/N]");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.format_message("Cancelled."));
            return Ok(());
        }
    }

    let store = create_backend(&config.vector_store, config.embedding.dimension)?;
    store.delete_all().await?;

    println!(
        "{}",
        formatter.format_message("All indexed vectors have been cleared.")
    );

    Ok(())
}
