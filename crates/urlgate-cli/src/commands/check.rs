//! Check command - evaluate candidates against the filter policy

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{debug, info};
use urlgate_core::{Config, Error, UrlPolicy};

/// Check command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Candidates to check (read from stdin, one per line, when omitted)
    pub candidates: Vec<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Allow pattern (overrides config)
    #[arg(short, long, value_name = "PATTERN")]
    pub allow: Option<String>,

    /// Deny pattern (overrides config)
    #[arg(short, long, value_name = "PATTERN")]
    pub deny: Option<String>,

    /// Ad-block token, may be repeated
    #[arg(short, long, value_name = "TOKEN")]
    pub block: Vec<String>,

    /// Ad-block token file, one token per line
    #[arg(long, value_name = "FILE")]
    pub block_file: Option<PathBuf>,

    /// Time budget per candidate in milliseconds (overrides config)
    #[arg(short, long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Exit with an error if any candidate is filtered
    #[arg(long)]
    pub fail_on_filtered: bool,
}

/// Per-run tallies
#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    filtered: usize,
    timed_out: usize,
    failed: usize,
}

impl Tally {
    fn total(&self) -> usize {
        self.passed + self.filtered + self.timed_out + self.failed
    }
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = build_config(&args)?;
    let policy = UrlPolicy::from_config(&config).context("Invalid filter configuration")?;

    let candidates = if args.candidates.is_empty() {
        read_stdin()?
    } else {
        args.candidates.clone()
    };

    let mut tally = Tally::default();
    for candidate in &candidates {
        let outcome = policy.evaluate(candidate);
        print_outcome(candidate, &outcome);

        match outcome {
            Ok(()) => tally.passed += 1,
            Err(ref e) if e.is_filtered() => tally.filtered += 1,
            Err(ref e) if e.is_deadline_exceeded() => tally.timed_out += 1,
            Err(_) => tally.failed += 1,
        }
    }

    info!(
        "Checked {} candidates: {} passed, {} filtered, {} timed out, {} failed",
        tally.total(),
        tally.passed,
        tally.filtered,
        tally.timed_out,
        tally.failed
    );

    if tally.timed_out + tally.failed > 0 {
        bail!(
            "{} of {} candidates could not be evaluated",
            tally.timed_out + tally.failed,
            tally.total()
        );
    }
    if args.fail_on_filtered && tally.filtered > 0 {
        bail!("{} of {} candidates filtered", tally.filtered, tally.total());
    }

    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &CheckArgs) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::default(),
    };

    if let Some(ref allow) = args.allow {
        config.filter.allow = allow.clone();
    }
    if let Some(ref deny) = args.deny {
        config.filter.deny = deny.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.filter.timeout_ms = timeout_ms;
    }

    if !args.block.is_empty() || args.block_file.is_some() {
        config.adblock.enabled = true;
        config.adblock.tokens.extend(args.block.iter().cloned());
        if args.block_file.is_some() {
            config.adblock.file = args.block_file.clone();
        }
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn read_stdin() -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read candidates from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            candidates.push(line.to_string());
        }
    }
    Ok(candidates)
}

fn print_outcome(candidate: &str, outcome: &urlgate_core::Result<()>) {
    match outcome {
        Ok(()) => println!("{}\t{}", "PASS".green(), candidate),
        Err(Error::Filtered { rule, .. }) => {
            println!("{}\t{}\t{}", "FILTERED".yellow(), candidate, rule);
        }
        Err(Error::DeadlineExceeded) => println!("{}\t{}", "TIMEOUT".red(), candidate),
        Err(e) => println!("{}\t{}\t{}", "ERROR".red().bold(), candidate, e),
    }
}
