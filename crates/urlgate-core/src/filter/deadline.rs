//! Allow/deny filtering under a deadline
//!
//! The allow pattern is evaluated first, then the deny pattern, each with
//! the budget left before the shared deadline at the moment its match
//! starts. A cheap allow check therefore leaves more time for the deny check.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::{match_until, MatchFailure};
use crate::error::{Error, FilterRule, Result};
use crate::pattern::{CompiledPattern, EngineError, PatternEngine, RegexEngine};

/// Default number of distinct pattern texts kept compiled
pub const DEFAULT_MAX_CACHED_PATTERNS: usize = 256;

/// Outcome of an allow/deny check
#[derive(Debug)]
pub enum Verdict {
    /// Candidate passes both patterns
    Pass,
    /// Candidate does not match the allow pattern
    FilteredByAllowList {
        /// Allow pattern text
        pattern: String,
    },
    /// Candidate matches the deny pattern
    FilteredByDenyList {
        /// Deny pattern text
        pattern: String,
    },
    /// Deadline elapsed while matching
    TimedOut,
    /// Pattern failed to compile or match
    MatchError {
        /// Pattern text that failed
        pattern: String,
        /// Underlying engine failure
        source: EngineError,
    },
}

impl Verdict {
    /// Whether the candidate passed
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Convert into the error-returning form
    pub fn into_result(self, candidate: &str) -> Result<()> {
        match self {
            Self::Pass => Ok(()),
            Self::FilteredByAllowList { pattern } => {
                Err(Error::filtered(candidate, FilterRule::AllowList { pattern }))
            }
            Self::FilteredByDenyList { pattern } => {
                Err(Error::filtered(candidate, FilterRule::DenyList { pattern }))
            }
            Self::TimedOut => Err(Error::DeadlineExceeded),
            Self::MatchError { pattern, source } => {
                Err(Error::match_failed(pattern, candidate, source))
            }
        }
    }
}

/// Allow/deny filter with a per-text cache of compiled patterns
///
/// Budgets are passed per match, so one compiled pattern serves every
/// deadline. The cache stops growing at its capacity; patterns beyond it are
/// compiled on every call. A capacity of zero disables caching.
pub struct DeadlineFilter<E = RegexEngine> {
    engine: E,
    cache: DashMap<String, Arc<dyn CompiledPattern>>,
    max_cached: usize,
}

impl Default for DeadlineFilter<RegexEngine> {
    fn default() -> Self {
        Self::new(RegexEngine::new())
    }
}

impl<E: PatternEngine> DeadlineFilter<E> {
    /// Create a filter with the default cache capacity
    pub fn new(engine: E) -> Self {
        Self::with_capacity(engine, DEFAULT_MAX_CACHED_PATTERNS)
    }

    /// Create a filter keeping at most `max_cached` compiled patterns
    pub fn with_capacity(engine: E, max_cached: usize) -> Self {
        Self {
            engine,
            cache: DashMap::new(),
            max_cached,
        }
    }

    /// Number of compiled patterns currently cached
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    /// Check `candidate` against the allow and deny patterns
    ///
    /// An empty pattern is skipped. With both empty the engine is never
    /// consulted and the result is [`Verdict::Pass`] whatever the deadline.
    pub fn check(&self, allow: &str, deny: &str, candidate: &str, deadline: Instant) -> Verdict {
        if !allow.is_empty() {
            match self.evaluate(allow, candidate, deadline) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("'{}' not matched by allow pattern '{}'", candidate, allow);
                    return Verdict::FilteredByAllowList {
                        pattern: allow.to_string(),
                    };
                }
                Err(verdict) => return verdict,
            }
        }

        if !deny.is_empty() {
            match self.evaluate(deny, candidate, deadline) {
                Ok(false) => {}
                Ok(true) => {
                    debug!("'{}' matched by deny pattern '{}'", candidate, deny);
                    return Verdict::FilteredByDenyList {
                        pattern: deny.to_string(),
                    };
                }
                Err(verdict) => return verdict,
            }
        }

        Verdict::Pass
    }

    /// Error-returning form of [`check`](Self::check)
    pub fn filter(&self, allow: &str, deny: &str, candidate: &str, deadline: Instant) -> Result<()> {
        self.check(allow, deny, candidate, deadline)
            .into_result(candidate)
    }

    fn evaluate(
        &self,
        pattern: &str,
        candidate: &str,
        deadline: Instant,
    ) -> std::result::Result<bool, Verdict> {
        let compiled = self.compiled(pattern).map_err(|source| {
            warn!("Pattern '{}' failed to compile: {}", pattern, source);
            Verdict::MatchError {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        match_until(compiled.as_ref(), candidate, deadline).map_err(|failure| match failure {
            MatchFailure::TimedOut => {
                debug!("Deadline exceeded matching '{}' against '{}'", candidate, pattern);
                Verdict::TimedOut
            }
            MatchFailure::Engine(source) => {
                warn!("'{}' cannot handle '{}': {}", pattern, candidate, source);
                Verdict::MatchError {
                    pattern: pattern.to_string(),
                    source,
                }
            }
        })
    }

    fn compiled(&self, pattern: &str) -> std::result::Result<Arc<dyn CompiledPattern>, EngineError> {
        if let Some(entry) = self.cache.get(pattern) {
            return Ok(Arc::clone(entry.value()));
        }

        let compiled = self.engine.compile(pattern)?;
        if self.cache.len() < self.max_cached {
            self.cache.insert(pattern.to_string(), Arc::clone(&compiled));
        }
        Ok(compiled)
    }
}
