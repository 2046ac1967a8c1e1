//! Deadline arithmetic shared by the filters
//!
//! Engines do not say whether a failure was a timeout. Filters classify a
//! failed match as a timeout when their own deadline has elapsed at the
//! moment the failure is observed. The deadline can pass between the engine
//! giving up and the re-check, so this classification is best-effort.

use std::time::{Duration, Instant};

/// Budget left before `deadline`, zero once it has passed
pub fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Whether `deadline` has been reached
pub fn has_elapsed(deadline: Instant) -> bool {
    Instant::now() >= deadline
}
