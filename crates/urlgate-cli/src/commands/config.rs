//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;
use urlgate_core::Config;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show configuration (defaults when no file is given)
    Show {
        /// Config file to show
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate a configuration file with default values
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "urlgate.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },
}

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show { file } => show_config(file),
        ConfigAction::Generate { output } => generate_config(output),
        ConfigAction::Validate { file } => validate_config(file),
    }
}

fn show_config(file: Option<PathBuf>) -> Result<()> {
    let config = match file {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::default(),
    };

    let toml_str = config.to_toml().context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

fn generate_config(output: PathBuf) -> Result<()> {
    let toml_str = Config::default()
        .to_toml()
        .context("Failed to serialize config")?;

    let content = format!(
        "# urlgate configuration\n\
         # filter.allow / filter.deny: patterns, empty disables the check\n\
         # adblock.tokens: literal substrings blocked anywhere in a candidate\n\n\
         {}",
        toml_str
    );

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    info!("Generated config file: {:?}", output);
    println!("Configuration file generated: {}", output.display());

    Ok(())
}

fn validate_config(file: PathBuf) -> Result<()> {
    let config = Config::load(&file)
        .with_context(|| format!("Failed to load config from {:?}", file))?;

    config.validate()
        .context("Configuration validation failed")?;

    let tokens = config.adblock_tokens().context("Failed to read ad-block tokens")?;

    println!("✓ Configuration is valid");
    println!("  Allow pattern: {}", display_pattern(&config.filter.allow));
    println!("  Deny pattern: {}", display_pattern(&config.filter.deny));
    println!("  Timeout: {} ms", config.filter.timeout_ms);
    println!(
        "  Ad-block: {} ({} tokens)",
        if config.adblock.enabled { "enabled" } else { "disabled" },
        tokens.len()
    );

    Ok(())
}

fn display_pattern(pattern: &str) -> &str {
    if pattern.is_empty() {
        "(none)"
    } else {
        pattern
    }
}
