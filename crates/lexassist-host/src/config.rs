use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime settings for an [`Assistant`](crate::Assistant) session.
///
/// Delays model perceived processing time only; no real work happens
/// during them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Pause before the cache check.
    pub analyze_delay_ms: u64,
    /// Pause before returning a cache hit.
    pub cache_hit_delay_ms: u64,
    /// Pause before a fresh knowledge lookup.
    pub search_delay_ms: u64,
    /// Maximum cached responses; `None` keeps every response for the session.
    pub cache_capacity: Option<usize>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            analyze_delay_ms: 500,
            cache_hit_delay_ms: 300,
            search_delay_ms: 800,
            cache_capacity: None,
        }
    }
}

impl AssistantConfig {
    /// Defaults with every simulated delay disabled.
    pub fn instant() -> Self {
        Self {
            analyze_delay_ms: 0,
            cache_hit_delay_ms: 0,
            search_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn analyze_delay(&self) -> Duration {
        Duration::from_millis(self.analyze_delay_ms)
    }

    pub fn cache_hit_delay(&self) -> Duration {
        Duration::from_millis(self.cache_hit_delay_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}
