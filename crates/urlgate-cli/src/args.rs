//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use crate::commands::Command;

/// urlgate - deadline-bounded URL filtering
///
/// Checks candidate URLs against allow/deny patterns and an ad-block token
/// list without ever running past a per-candidate time budget.
#[derive(Parser, Debug)]
#[command(name = "urlgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose() {
        let args = Args::parse_from(["urlgate", "-v", "check", "https://a.com"]);
        assert_eq!(args.verbose, 1);

        let args = Args::parse_from(["urlgate", "check", "-vvv", "https://a.com"]);
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn test_check_args() {
        let args = Args::parse_from([
            "urlgate",
            "check",
            "--allow",
            "^https://",
            "--block",
            "ads",
            "--block",
            "tracker",
            "--timeout-ms",
            "250",
            "https://a.com",
            "https://b.com",
        ]);

        match args.command {
            Command::Check(check) => {
                assert_eq!(check.allow.as_deref(), Some("^https://"));
                assert_eq!(check.block, vec!["ads", "tracker"]);
                assert_eq!(check.timeout_ms, Some(250));
                assert_eq!(check.candidates.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
