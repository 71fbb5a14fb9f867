use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use ragchat::cli::commands::{
    handle_ask, handle_chat, handle_clear, handle_config, handle_index, handle_interactive,
    handle_stats,
};
use ragchat::cli::{Cli, Commands};
use ragchat::models::{Config, OutputFormat};

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ragchat=info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let default_format = Config::load()
        .map(|c| c.chat.default_format)
        .unwrap_or_default();
    let format = cli.format.unwrap_or(default_format);
    let verbose = cli.verbose;

    tokio::select! {
        result = run_command(cli.command, format, verbose) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, exiting...");
        }
    }

    Ok(())
}

async fn run_command(command: Option<Commands>, format: OutputFormat, verbose: bool) -> Result<()> {
    match command {
        None => handle_interactive(format, verbose).await?,
        Some(Commands::Index(args)) => handle_index(args, format, verbose).await?,
        Some(Commands::Ask(args)) => handle_ask(args, format, verbose).await?,
        Some(Commands::Chat(args)) => handle_chat(args, format, verbose).await?,
        Some(Commands::Stats) => handle_stats(format, verbose).await?,
        Some(Commands::Clear(args)) => handle_clear(args, format, verbose).await?,
        Some(Commands::Config(cmd)) => handle_config(cmd, format, verbose).await?,
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
