//! CLI module for the retrieval-augmented chatbot.

pub mod commands;
pub mod interactive;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Chat with your documents: index text and PDF files, then ask questions
/// answered from the most relevant passages.
#[derive(Debug, Parser)]
#[command(name = "ragchat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index a directory of .txt and .pdf documents
    Index(commands::IndexArgs),

    /// Answer one question with cited sources
    Ask(commands::AskArgs),

    /// Start an interactive chat
    Chat(commands::ChatArgs),

    /// Show vector index statistics
    Stats,

    /// Delete all indexed vectors
    Clear(commands::ClearArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["ragchat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_ask_with_options() {
        let cli = Cli::try_parse_from(["ragchat", "-f", "json", "ask", "What is Rust?", "-k", "6"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Some(Commands::Ask(args)) => {
                assert_eq!(args.question, "What is Rust?");
                assert_eq!(args.top_k, Some(6));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_init_force_with_global_format() {
        let cli = Cli::try_parse_from(["ragchat", "config", "init", "--force", "-f", "json"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Some(Commands::Config(commands::ConfigCommand::Init { force: true }))
        ));
    }

    #[test]
    fn test_index_path_optional() {
        let cli = Cli::try_parse_from(["ragchat", "index"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Index(ref a)) if a.path.is_none()));

        let cli = Cli::try_parse_from(["ragchat", "index", "./docs", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Index(ref a)) if a.path.is_some()));
    }
}
