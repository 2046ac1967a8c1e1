//! Pattern matching capability
//!
//! Filters only ever talk to a [`PatternEngine`]: compile a pattern from text,
//! then match candidates against it with a time budget. The default engine is
//! [`RegexEngine`], backed by `fancy_regex`.
//!
//! The budget is best-effort. A zero budget fails fast without touching the
//! regex, and a match that returns after its budget elapsed is reported as
//! [`EngineError::BudgetExhausted`]. Catastrophic backtracking is bounded by
//! the engine's backtrack limit and surfaces as [`EngineError::Regex`].
//! Callers must not rely on the variant to tell timeouts apart from other
//! failures; they re-check their own deadline instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fancy_regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Default number of backtracking steps before a match is abandoned
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Failure reported by a pattern engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The match did not complete within its budget
    #[error("match timeout after {budget:?}")]
    BudgetExhausted {
        /// Budget the match was given
        budget: Duration,
    },

    /// Compilation or matching failed inside the regex engine
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
}

/// A compiled pattern, safe for concurrent read-only use
pub trait CompiledPattern: Send + Sync {
    /// Source text the pattern was compiled from
    fn as_str(&self) -> &str;

    /// Match `candidate` within `budget`
    ///
    /// Implementations may only be able to check the budget before and after
    /// the match; [`RegexEngine`] fails fast on a zero budget and reports an
    /// overrun once `is_match` returns.
    fn match_within(&self, candidate: &str, budget: Duration) -> Result<bool, EngineError>;
}

/// Compiles pattern text into [`CompiledPattern`]s
///
/// Compilation must be deterministic and free of side effects, so compiling
/// the same text twice yields equivalent patterns.
#[cfg_attr(test, mockall::automock)]
pub trait PatternEngine: Send + Sync {
    /// Compile `pattern`
    fn compile(&self, pattern: &str) -> Result<Arc<dyn CompiledPattern>, EngineError>;
}

impl<E: PatternEngine + ?Sized> PatternEngine for Arc<E> {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn CompiledPattern>, EngineError> {
        (**self).compile(pattern)
    }
}

/// Default engine backed by `fancy_regex`
#[derive(Debug, Clone, Copy)]
pub struct RegexEngine {
    backtrack_limit: usize,
}

impl Default for RegexEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexEngine {
    /// Create an engine with the default backtrack limit
    pub fn new() -> Self {
        Self::with_backtrack_limit(DEFAULT_BACKTRACK_LIMIT)
    }

    /// Create an engine with a custom backtrack limit
    pub fn with_backtrack_limit(backtrack_limit: usize) -> Self {
        Self { backtrack_limit }
    }

    /// Configured backtrack limit
    pub fn backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }
}

impl PatternEngine for RegexEngine {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn CompiledPattern>, EngineError> {
        let regex = RegexBuilder::new(pattern)
            .backtrack_limit(self.backtrack_limit)
            .build()?;
        Ok(Arc::new(RegexPattern { regex }))
    }
}

/// Pattern compiled by [`RegexEngine`]
#[derive(Debug)]
pub struct RegexPattern {
    regex: Regex,
}

impl CompiledPattern for RegexPattern {
    fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    fn match_within(&self, candidate: &str, budget: Duration) -> Result<bool, EngineError> {
        if budget.is_zero() {
            return Err(EngineError::BudgetExhausted { budget });
        }

        let started = Instant::now();
        let matched = self.regex.is_match(candidate)?;

        if started.elapsed() > budget {
            return Err(EngineError::BudgetExhausted { budget });
        }

        Ok(matched)
    }
}

/// Build the "contains anywhere" expression for a literal token
pub fn contains_pattern(token: &str) -> String {
    format!(".*{}.*", fancy_regex::escape(token))
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    /// Pattern that always answers the same way
    pub(crate) struct Fixed(pub(crate) bool);

    impl CompiledPattern for Fixed {
        fn as_str(&self) -> &str {
            "fixed"
        }

        fn match_within(&self, _: &str, _: Duration) -> Result<bool, EngineError> {
            Ok(self.0)
        }
    }

    /// Pattern that always fails with a non-timeout engine error
    pub(crate) struct Broken;

    impl CompiledPattern for Broken {
        fn as_str(&self) -> &str {
            "broken"
        }

        fn match_within(&self, _: &str, _: Duration) -> Result<bool, EngineError> {
            Err(engine_fault())
        }
    }

    /// A real regex error, for doubles that need one
    pub(crate) fn engine_fault() -> EngineError {
        match RegexEngine::new().compile("(") {
            Err(err) => err,
            Ok(_) => panic!("unbalanced group should not compile"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: Duration = Duration::from_secs(10);

    #[test]
    fn test_compile_and_match() {
        let engine = RegexEngine::new();
        let pattern = engine.compile(r"^https://example\.com/").unwrap();

        assert_eq!(pattern.as_str(), r"^https://example\.com/");
        assert!(pattern.match_within("https://example.com/page", LONG).unwrap());
        assert!(!pattern.match_within("https://other.com/page", LONG).unwrap());
    }

    #[test]
    fn test_malformed_pattern() {
        let engine = RegexEngine::new();
        let err = engine.compile("([unclosed").err().unwrap();
        assert!(matches!(err, EngineError::Regex(_)));
    }

    #[test]
    fn test_zero_budget_fails_fast() {
        let engine = RegexEngine::new();
        let pattern = engine.compile("a").unwrap();

        let err = pattern.match_within("a", Duration::ZERO).unwrap_err();
        assert!(matches!(err, EngineError::BudgetExhausted { .. }));
    }

    #[test]
    fn test_backtrack_limit_is_engine_error() {
        let engine = RegexEngine::with_backtrack_limit(100_000);
        // Lookahead forces the backtracking VM
        let pattern = engine.compile("(?i)(a|b|ab)*(?=c)").unwrap();

        let err = pattern
            .match_within(&"ab".repeat(28), LONG)
            .unwrap_err();
        assert!(matches!(err, EngineError::Regex(_)));
    }

    #[test]
    fn test_contains_pattern_escapes_token() {
        assert_eq!(contains_pattern("ads"), ".*ads.*");
        assert_eq!(contains_pattern("ad.js"), r".*ad\.js.*");

        let engine = RegexEngine::new();
        let pattern = engine.compile(&contains_pattern("ad.js")).unwrap();
        assert!(pattern.match_within("https://x.com/ad.js", LONG).unwrap());
        assert!(!pattern.match_within("https://x.com/adxjs", LONG).unwrap());
    }
}
