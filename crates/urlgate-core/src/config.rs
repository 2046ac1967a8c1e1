//! Configuration management for urlgate
//!
//! Provides a strongly-typed configuration system with TOML support.

use crate::error::{Error, Result};
use crate::filter::{parse_tokens, DEFAULT_MAX_CACHED_PATTERNS};
use crate::pattern::{PatternEngine, RegexEngine, DEFAULT_BACKTRACK_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default time budget per evaluated candidate, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Allow/deny pattern settings
    pub filter: FilterConfig,

    /// Ad-block token list settings
    pub adblock: AdBlockConfig,

    /// Pattern engine tuning
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.filter.timeout_ms == 0 {
            return Err(Error::config_value("filter.timeout_ms", "Must be greater than 0"));
        }

        if self.engine.backtrack_limit == 0 {
            return Err(Error::config_value(
                "engine.backtrack_limit",
                "Must be greater than 0",
            ));
        }

        // Patterns are compiled on first use; catch typos up front
        let engine = self.engine.build();
        for (key, pattern) in [("filter.allow", &self.filter.allow), ("filter.deny", &self.filter.deny)] {
            if pattern.is_empty() {
                continue;
            }
            if let Err(e) = engine.compile(pattern) {
                return Err(Error::config_value(key, format!("Invalid pattern '{pattern}': {e}")));
            }
        }

        if self.adblock.enabled {
            if let Some(ref path) = self.adblock.file {
                if !path.exists() {
                    return Err(Error::BlockList {
                        path: path.display().to_string(),
                        message: "File not found".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Ad-block tokens from the inline list followed by the token file
    pub fn adblock_tokens(&self) -> Result<Vec<String>> {
        let mut tokens = self.adblock.tokens.clone();

        if let Some(ref path) = self.adblock.file {
            let content = std::fs::read_to_string(path).map_err(|e| Error::BlockList {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            tokens.extend(parse_tokens(&content));
        }

        Ok(tokens)
    }
}

/// Allow/deny pattern configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Candidates must match this pattern (empty = allow everything)
    pub allow: String,
    /// Candidates must not match this pattern (empty = deny nothing)
    pub deny: String,
    /// Time budget per candidate in milliseconds
    pub timeout_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allow: String::new(),
            deny: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FilterConfig {
    /// Time budget per candidate
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Ad-block configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdBlockConfig {
    /// Enable ad-block token filtering
    pub enabled: bool,
    /// Inline tokens
    pub tokens: Vec<String>,
    /// Token file, one token per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Pattern engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backtracking steps before a match is abandoned
    pub backtrack_limit: usize,
    /// Distinct allow/deny patterns kept compiled
    pub max_cached_patterns: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            max_cached_patterns: DEFAULT_MAX_CACHED_PATTERNS,
        }
    }
}

impl EngineConfig {
    /// Build the configured regex engine
    pub fn build(&self) -> RegexEngine {
        RegexEngine::with_backtrack_limit(self.backtrack_limit)
    }
}
