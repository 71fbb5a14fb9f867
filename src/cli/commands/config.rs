use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{Config, OutputFormat};

const MASK: &str = "********";

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize configuration file with defaults")]
    Init {
        #[arg(long, help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Show configuration file path")]
    Path,
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { force } => handle_init(force, formatter.as_ref()),
        ConfigCommand::Show => handle_show(format),
        ConfigCommand::Path => handle_path(formatter.as_ref()),
    }
}

fn handle_init(force: bool, formatter: &dyn Formatter) -> Result<()> {
    let config_path =
        Config::config_path().ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    let path = Config::default()
        .save()
        .context("failed to create config")?;
    println!(
        "{}",
        formatter.format_message(&format!("Created config at: {}", path.display()))
    );

    Ok(())
}

/// Effective configuration with secrets masked.
fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    if config.vector_store.api_key.is_some() {
        config.vector_store.api_key = Some(MASK.to_string());
    }
    config
}

fn handle_show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let api_key_set = config.require_api_key().is_ok();
    let shown = masked(&config);

    if format == OutputFormat::Json {
        let mut value = serde_json::to_value(&shown)?;
        value["provider"]["api_key"] = if api_key_set {
            serde_json::Value::String(MASK.to_string())
        } else {
            serde_json::Value::Null
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(path) = Config::config_path() {
        let state = if path.exists() { "" } else { " (not created, using defaults)" };
        println!("# Config file: {}{}", path.display(), state);
    }
    println!(
        "# GEMINI_API_KEY: {}",
        if api_key_set { "set" } else { "not set" }
    );
    println!();
    print!("{}", toml::to_string_pretty(&shown)?);

    Ok(())
}

fn handle_path(formatter: &dyn Formatter) -> Result<()> {
    let path =
        Config::config_path().ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
    let state = if path.exists() { "exists" } else { "not created" };
    println!(
        "{}",
        formatter.format_message(&format!("{} ({})", path.display(), state))
    );
    Ok(())
}
