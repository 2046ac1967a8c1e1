//! Shared test doubles

use std::sync::{Arc, Mutex};
use std::time::Duration;

use urlgate_core::{CompiledPattern, EngineError, PatternEngine};

/// Engine whose patterns record the budget of every match
///
/// Patterns whose text starts with `allow` match; every other pattern does
/// not. Each match sleeps for `delay` so later matches see less budget.
pub struct RecordingEngine {
    delay: Duration,
    budgets: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl RecordingEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            budgets: Arc::default(),
        }
    }

    /// Pattern text and budget of each match, in call order
    pub fn budgets(&self) -> Vec<(String, Duration)> {
        self.budgets.lock().unwrap().clone()
    }
}

impl PatternEngine for RecordingEngine {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn CompiledPattern>, EngineError> {
        Ok(Arc::new(RecordingPattern {
            text: pattern.to_string(),
            delay: self.delay,
            budgets: Arc::clone(&self.budgets),
        }))
    }
}

struct RecordingPattern {
    text: String,
    delay: Duration,
    budgets: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl CompiledPattern for RecordingPattern {
    fn as_str(&self) -> &str {
        &self.text
    }

    fn match_within(&self, _candidate: &str, budget: Duration) -> Result<bool, EngineError> {
        self.budgets.lock().unwrap().push((self.text.clone(), budget));
        std::thread::sleep(self.delay);
        Ok(self.text.starts_with("allow"))
    }
}
