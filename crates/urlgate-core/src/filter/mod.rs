//! Deadline-bounded filtering
//!
//! Two filters share one pattern engine contract:
//! - [`DeadlineFilter`] evaluates a candidate against an allow pattern and a
//!   deny pattern, both optional, supplied per call
//! - [`AdBlockList`] evaluates a candidate against a fixed list of literal
//!   tokens compiled once on first use
//!
//! Both bound every match by the caller's deadline and classify a failed
//! match as a timeout only if that deadline has elapsed when the failure is
//! observed.

mod adblock;
mod deadline;

pub use adblock::{parse_tokens, AdBlockList, AdBlockVerdict};
pub use deadline::{DeadlineFilter, Verdict, DEFAULT_MAX_CACHED_PATTERNS};

use std::time::Instant;

use crate::budget;
use crate::pattern::{CompiledPattern, EngineError};

/// Why a single match produced no answer
#[derive(Debug)]
enum MatchFailure {
    /// Deadline had elapsed when the failure was observed
    TimedOut,
    /// Any other engine failure
    Engine(EngineError),
}

/// Match `candidate` with whatever budget is left before `deadline`
fn match_until(
    pattern: &dyn CompiledPattern,
    candidate: &str,
    deadline: Instant,
) -> Result<bool, MatchFailure> {
    pattern
        .match_within(candidate, budget::remaining(deadline))
        .map_err(|source| {
            if budget::has_elapsed(deadline) {
                MatchFailure::TimedOut
            } else {
                MatchFailure::Engine(source)
            }
        })
}
