//! CLI commands

pub mod check;
pub mod config;

use clap::Subcommand;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check candidates against the filter policy
    Check(check::CheckArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}
