//! Async session wrapper: simulated processing delay plus per-session stats.

use std::sync::Arc;

use lexassist_core::{KnowledgeSource, Level, Response};
use lexassist_store::{ResponseCache, StoreError};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::assembler::{Assembler, Stage};
use crate::config::AssistantConfig;

/// Counters for answered queries, by provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub direct: u64,
    pub cached: u64,
    pub fallback: u64,
    pub total: u64,
    pub cost: f64,
}

impl SessionStats {
    pub fn record(&mut self, response: &Response) {
        match response.level {
            Level::Direct => self.direct += 1,
            Level::Cached => self.cached += 1,
            Level::Fallback => self.fallback += 1,
        }
        self.total += 1;
        // Replays are free; only fresh answers are billed.
        if !response.cached {
            self.cost += response.cost;
        }
    }
}

/// One conversation with the assistant.
///
/// `submit` takes `&mut self`, so a single session processes one query at a
/// time. Share it through [`SharedAssistant`] to queue overlapping callers.
pub struct Assistant {
    assembler: Assembler,
    config: AssistantConfig,
    stats: SessionStats,
}

/// FIFO-queued handle for callers that submit concurrently.
pub type SharedAssistant = Arc<Mutex<Assistant>>;

impl Assistant {
    pub fn new(kb: Arc<dyn KnowledgeSource>, config: AssistantConfig) -> Result<Self, StoreError> {
        let cache = ResponseCache::with_capacity(config.cache_capacity)?;
        info!(
            cache_capacity = ?config.cache_capacity,
            analyze_ms = config.analyze_delay_ms,
            search_ms = config.search_delay_ms,
            "assistant ready"
        );
        Ok(Self {
            assembler: Assembler::new(kb, cache),
            config,
            stats: SessionStats::default(),
        })
    }

    /// Wrap for concurrent use. `tokio::sync::Mutex` hands out the lock in
    /// request order, so overlapping submissions are answered in turn.
    pub fn shared(self) -> SharedAssistant {
        Arc::new(Mutex::new(self))
    }

    /// Answer a query after the simulated delays.
    ///
    /// Blank input returns `None` immediately: no delay, no stats, no cache
    /// entry.
    pub async fn submit(&mut self, text: &str) -> Option<Response> {
        let key = self.assembler.begin(text)?;
        sleep(self.config.analyze_delay()).await;

        let response = match self.assembler.check_cache(&key) {
            Some(hit) => {
                sleep(self.config.cache_hit_delay()).await;
                hit
            }
            None => {
                sleep(self.config.search_delay()).await;
                self.assembler.search(text, key)
            }
        };

        self.stats.record(&response);
        debug!(
            level = %response.level,
            cached = response.cached,
            total = self.stats.total,
            "query answered"
        );
        Some(response)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.assembler.stage()
    }

    pub fn cached_responses(&self) -> usize {
        self.assembler.cache().len()
    }

    pub fn knowledge(&self) -> &Arc<dyn KnowledgeSource> {
        self.assembler.classifier().knowledge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexassist_core::{KnowledgeBase, ResponseKind};

    fn assistant(config: AssistantConfig) -> Assistant {
        Assistant::new(Arc::new(KnowledgeBase::bundled().unwrap()), config).unwrap()
    }

    #[test]
    fn stats_count_levels_and_cost() {
        let mut stats = SessionStats::default();
        let mut fresh = Response::new("q", ResponseKind::General, Level::Fallback);
        fresh.cost = 0.0001;
        stats.record(&fresh);
        stats.record(&fresh.clone().replayed());
        stats.record(&Response::new("r", ResponseKind::Topic, Level::Direct));
        assert_eq!(stats.fallback, 1);
        assert_eq!(stats.cached, 1);
        assert_eq!(stats.direct, 1);
        assert_eq!(stats.total, 3);
        assert!((stats.cost - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = AssistantConfig {
            cache_capacity: Some(0),
            ..AssistantConfig::instant()
        };
        let result = Assistant::new(Arc::new(KnowledgeBase::bundled().unwrap()), config);
        assert!(matches!(result, Err(StoreError::ZeroCapacity)));
    }

    #[tokio::test]
    async fn blank_submit_leaves_no_trace() {
        let mut a = assistant(AssistantConfig::instant());
        assert!(a.submit(" \t ").await.is_none());
        assert_eq!(a.stats().total, 0);
        assert_eq!(a.cached_responses(), 0);
        assert_eq!(a.stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn repeat_is_served_from_cache() {
        let mut a = assistant(AssistantConfig::instant());
        let first = a.submit("rude behaviour at work").await.unwrap();
        let second = a.submit("Rude behaviour at work  ").await.unwrap();
        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(second.level, Level::Cached);
        assert!(second.same_content(&first));
        assert_eq!(a.stats().direct, 1);
        assert_eq!(a.stats().cached, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_delays_follow_config() {
        let mut a = assistant(AssistantConfig::default());

        let start = tokio::time::Instant::now();
        a.submit("section 420").await.unwrap();
        assert_eq!(start.elapsed().as_millis(), 500 + 800);

        let start = tokio::time::Instant::now();
        a.submit("section 420").await.unwrap();
        assert_eq!(start.elapsed().as_millis(), 500 + 300);
    }
}
