//! urlgate CLI
//!
//! Command-line interface for deadline-bounded URL filtering.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    match args.command {
        commands::Command::Check(check_args) => commands::check::execute(check_args),
        commands::Command::Config(config_args) => commands::config::execute(config_args),
    }
}
