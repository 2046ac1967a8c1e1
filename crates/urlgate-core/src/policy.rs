//! URL policy built from configuration
//!
//! Applies the allow/deny filter and then the ad-block list to a candidate,
//! both under one deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::filter::{AdBlockList, DeadlineFilter};
use crate::pattern::RegexEngine;

/// Configured filtering policy
pub struct UrlPolicy {
    filter: DeadlineFilter,
    allow: String,
    deny: String,
    adblock: Option<Arc<AdBlockList>>,
    timeout: Duration,
}

impl UrlPolicy {
    /// Create a policy from configuration
    ///
    /// The ad-block list is attached only when enabled; its patterns are still
    /// compiled on first use.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let engine = config.engine.build();
        let adblock = if config.adblock.enabled {
            let list = AdBlockList::new(engine, config.adblock_tokens()?);
            debug!("Ad-block list enabled with {} tokens", list.len());
            Some(Arc::new(list))
        } else {
            None
        };

        Ok(Self {
            filter: DeadlineFilter::with_capacity(engine, config.engine.max_cached_patterns),
            allow: config.filter.allow.clone(),
            deny: config.filter.deny.clone(),
            adblock,
            timeout: config.filter.timeout(),
        })
    }

    /// Create a policy from parts
    pub fn new(allow: impl Into<String>, deny: impl Into<String>, timeout: Duration) -> Self {
        Self {
            filter: DeadlineFilter::new(RegexEngine::new()),
            allow: allow.into(),
            deny: deny.into(),
            adblock: None,
            timeout,
        }
    }

    /// Attach a shared ad-block list
    pub fn with_adblock(mut self, list: Arc<AdBlockList>) -> Self {
        self.adblock = Some(list);
        self
    }

    /// Time budget per candidate
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attached ad-block list, if any
    pub fn adblock(&self) -> Option<&Arc<AdBlockList>> {
        self.adblock.as_ref()
    }

    /// Evaluate `candidate` with a deadline of now plus the configured timeout
    pub fn evaluate(&self, candidate: &str) -> Result<()> {
        self.evaluate_until(candidate, Instant::now() + self.timeout)
    }

    /// Evaluate `candidate` against an explicit deadline
    pub fn evaluate_until(&self, candidate: &str, deadline: Instant) -> Result<()> {
        self.filter
            .filter(&self.allow, &self.deny, candidate, deadline)?;

        if let Some(ref list) = self.adblock {
            list.filter(candidate, deadline)?;
        }

        Ok(())
    }
}
