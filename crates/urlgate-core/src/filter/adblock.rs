//! Ad-block token filtering
//!
//! A block list is a fixed set of literal tokens. Each token becomes a
//! "contains anywhere" pattern, compiled the first time the list is used and
//! shared read-only afterwards. Concurrent first callers wait for that single
//! build and never observe a partial list.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{match_until, MatchFailure};
use crate::error::{Error, FilterRule, Result};
use crate::pattern::{contains_pattern, CompiledPattern, EngineError, PatternEngine, RegexEngine};

/// Outcome of an ad-block check
#[derive(Debug)]
pub enum AdBlockVerdict {
    /// No token matched
    Pass,
    /// A token matched
    Blocked {
        /// First matching token, in list order
        token: String,
        /// Expression compiled from the token
        pattern: String,
    },
    /// Deadline elapsed while matching
    TimedOut,
    /// A pattern failed to compile or match
    MatchError {
        /// Expression that failed
        pattern: String,
        /// Underlying engine failure
        source: EngineError,
    },
}

impl AdBlockVerdict {
    /// Whether the candidate passed
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Convert into the error-returning form
    pub fn into_result(self, candidate: &str) -> Result<()> {
        match self {
            Self::Pass => Ok(()),
            Self::Blocked { token, pattern } => Err(Error::filtered(
                candidate,
                FilterRule::AdBlock { token, pattern },
            )),
            Self::TimedOut => Err(Error::DeadlineExceeded),
            Self::MatchError { pattern, source } => {
                Err(Error::match_failed(pattern, candidate, source))
            }
        }
    }
}

struct BlockedPattern {
    token: String,
    expr: String,
    compiled: Arc<dyn CompiledPattern>,
}

/// Lazily compiled list of blocked tokens
///
/// Construct once at startup and share by reference or `Arc`.
pub struct AdBlockList<E = RegexEngine> {
    engine: E,
    tokens: Vec<String>,
    patterns: OnceCell<Vec<BlockedPattern>>,
}

impl<E: PatternEngine> AdBlockList<E> {
    /// Create a list from tokens
    ///
    /// Every token is kept exactly as given, in order. An empty token
    /// compiles to `.*.*` and blocks every candidate. Comment handling only
    /// applies to list files, see [`parse_tokens`].
    pub fn new<I, S>(engine: E, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();

        Self {
            engine,
            tokens,
            patterns: OnceCell::new(),
        }
    }

    /// Load tokens from a file, one per line
    pub fn load<P: AsRef<Path>>(engine: E, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::BlockList {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let list = Self::new(engine, parse_tokens(&content));
        info!("Loaded {} ad-block tokens from {}", list.len(), path.display());
        Ok(list)
    }

    /// Tokens in match order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the list has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the patterns have been compiled
    pub fn is_built(&self) -> bool {
        self.patterns.get().is_some()
    }

    /// Compile the patterns now instead of on first use
    pub fn build(&self) -> Result<()> {
        self.patterns()
            .map(|_| ())
            .map_err(|(pattern, source)| Error::Compile { pattern, source })
    }

    /// Check `candidate` against every token in order
    ///
    /// Each match gets the budget left before `deadline`. The first match or
    /// failure ends the scan.
    pub fn check(&self, candidate: &str, deadline: Instant) -> AdBlockVerdict {
        let patterns = match self.patterns() {
            Ok(patterns) => patterns,
            Err((pattern, source)) => return AdBlockVerdict::MatchError { pattern, source },
        };

        for blocked in patterns {
            match match_until(blocked.compiled.as_ref(), candidate, deadline) {
                Ok(false) => {}
                Ok(true) => {
                    debug!("'{}' blocked by ad-block token '{}'", candidate, blocked.token);
                    return AdBlockVerdict::Blocked {
                        token: blocked.token.clone(),
                        pattern: blocked.expr.clone(),
                    };
                }
                Err(MatchFailure::TimedOut) => {
                    debug!("Deadline exceeded matching '{}' against ad-block list", candidate);
                    return AdBlockVerdict::TimedOut;
                }
                Err(MatchFailure::Engine(source)) => {
                    warn!("'{}' cannot handle '{}': {}", blocked.expr, candidate, source);
                    return AdBlockVerdict::MatchError {
                        pattern: blocked.expr.clone(),
                        source,
                    };
                }
            }
        }

        AdBlockVerdict::Pass
    }

    /// Error-returning form of [`check`](Self::check)
    pub fn filter(&self, candidate: &str, deadline: Instant) -> Result<()> {
        self.check(candidate, deadline).into_result(candidate)
    }

    fn patterns(&self) -> std::result::Result<&[BlockedPattern], (String, EngineError)> {
        self.patterns
            .get_or_try_init(|| {
                let mut patterns = Vec::with_capacity(self.tokens.len());
                for token in &self.tokens {
                    let expr = contains_pattern(token);
                    let compiled = match self.engine.compile(&expr) {
                        Ok(compiled) => compiled,
                        Err(source) => {
                            warn!("Ad-block pattern '{}' failed to compile: {}", expr, source);
                            return Err((expr, source));
                        }
                    };
                    debug!("Compiled ad-block pattern {}", expr);
                    patterns.push(BlockedPattern {
                        token: token.clone(),
                        expr,
                        compiled,
                    });
                }
                info!("Compiled {} ad-block patterns", patterns.len());
                Ok(patterns)
            })
            .map(Vec::as_slice)
    }
}

/// Parse a token list file: one token per line
///
/// Lines are trimmed. Blank lines and lines starting with `#` or `!` are
/// comments.
pub fn parse_tokens(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(str::to_string)
        .collect()
}
