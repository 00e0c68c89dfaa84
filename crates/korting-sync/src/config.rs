//! Controller configuration.

use serde::{Deserialize, Serialize};

/// Tuning for the synchronization controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Abort the task of a superseded offer query instead of letting it
    /// run to completion. Its result is discarded either way.
    pub abort_superseded: bool,
    /// Show stats derived from the displayed offers when the global stats
    /// could not be loaded.
    pub stats_fallback: bool,
}

impl SyncConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether superseded queries are aborted.
    pub fn with_abort_superseded(mut self, abort: bool) -> Self {
        self.abort_superseded = abort;
        self
    }

    /// Set whether derived stats stand in for missing global stats.
    pub fn with_stats_fallback(mut self, fallback: bool) -> Self {
        self.stats_fallback = fallback;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            abort_superseded: false,
            stats_fallback: true,
        }
    }
}
