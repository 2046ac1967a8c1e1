//! # urlgate Core
//!
//! Deadline-bounded filtering of candidate strings (typically URLs).
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Allow/deny filtering** - Per-call patterns bounded by a deadline
//! - **Ad-block filtering** - Literal tokens compiled once and shared
//! - **Pattern engine contract** - Compile, then match with a time budget
//! - **Configuration** - TOML-backed policy settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::{Duration, Instant};
//! use urlgate_core::{AdBlockList, DeadlineFilter, RegexEngine};
//!
//! let filter = DeadlineFilter::new(RegexEngine::new());
//! let ads = AdBlockList::new(RegexEngine::new(), ["ads", "tracker"]);
//!
//! let deadline = Instant::now() + Duration::from_secs(1);
//! filter.filter(r"^https://", "", "https://example.com/", deadline)?;
//! ads.filter("https://example.com/", deadline)?;
//! # Ok::<(), urlgate_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod budget;
pub mod config;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod policy;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, FilterRule, Result};
pub use filter::{AdBlockList, AdBlockVerdict, DeadlineFilter, Verdict};
pub use pattern::{CompiledPattern, EngineError, PatternEngine, RegexEngine};
pub use policy::UrlPolicy;
