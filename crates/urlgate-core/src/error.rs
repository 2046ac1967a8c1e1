//! Error types for urlgate-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.

use std::fmt;
use thiserror::Error;

use crate::pattern::EngineError;

/// The rule that excluded a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    /// Candidate did not match the allow pattern
    AllowList {
        /// Allow pattern text
        pattern: String,
    },
    /// Candidate matched the deny pattern
    DenyList {
        /// Deny pattern text
        pattern: String,
    },
    /// Candidate contains a blocked ad-block token
    AdBlock {
        /// Token as supplied in the block list
        token: String,
        /// Compiled expression derived from the token
        pattern: String,
    },
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowList { pattern } => {
                write!(f, "does not match the expression from the allowed list '{pattern}'")
            }
            Self::DenyList { pattern } => {
                write!(f, "matches the expression from the denied list '{pattern}'")
            }
            Self::AdBlock { pattern, .. } => {
                write!(f, "matches expression from adblock list '{pattern}'")
            }
        }
    }
}

/// Main error type for urlgate-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Candidate was excluded by policy
    #[error("'{candidate}' {rule}: value filtered")]
    Filtered {
        /// The filtered value
        candidate: String,
        /// Rule responsible for the exclusion
        rule: FilterRule,
    },

    /// Matching could not finish before the caller's deadline
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Pattern engine failed for a reason other than the deadline
    #[error("'{pattern}' cannot handle '{candidate}': {source}")]
    Match {
        /// Pattern text that failed
        pattern: String,
        /// Candidate being matched
        candidate: String,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },

    /// Pattern failed to compile outside of a match call
    #[error("Invalid pattern '{pattern}': {source}")]
    Compile {
        /// Pattern text that failed
        pattern: String,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Block list file error
    #[error("Block list file error for '{path}': {message}")]
    BlockList {
        /// Path to the block list file
        path: String,
        /// Error message
        message: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a filtered error
    pub fn filtered(candidate: impl Into<String>, rule: FilterRule) -> Self {
        Self::Filtered {
            candidate: candidate.into(),
            rule,
        }
    }

    /// Create a match error
    pub fn match_failed(
        pattern: impl Into<String>,
        candidate: impl Into<String>,
        source: EngineError,
    ) -> Self {
        Self::Match {
            pattern: pattern.into(),
            candidate: candidate.into(),
            source,
        }
    }

    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether the candidate was excluded by policy rather than by a failure
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered { .. })
    }

    /// Whether matching ran out of time
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }

    /// The rule behind a filtered error
    pub fn filter_rule(&self) -> Option<&FilterRule> {
        match self {
            Self::Filtered { rule, .. } => Some(rule),
            _ => None,
        }
    }
}
