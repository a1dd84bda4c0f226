//! Response cache keyed by normalised query text.
//!
//! Entries are written whole and never mutated; a fresh computation for the
//! same key overwrites the previous entry. There is no TTL and no explicit
//! invalidation. By default the cache grows for the life of the session;
//! given a capacity it evicts the least recently used entry.

use std::num::NonZeroUsize;

use lexassist_core::{Response, normalize_query};
use lru::LruCache;
use tracing::debug;

use crate::StoreError;

/// Cache key for a raw query: lower-cased and trimmed.
///
/// `None` for blank input, which is never cached.
pub fn cache_key(raw: &str) -> Option<String> {
    normalize_query(raw)
}

pub struct ResponseCache {
    entries: LruCache<String, Response>,
    capacity: Option<NonZeroUsize>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl ResponseCache {
    pub fn unbounded() -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity: None,
        }
    }

    /// LRU cache holding at most `capacity` responses.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            capacity: Some(capacity),
        }
    }

    /// Build from an optional configured capacity. `None` is unbounded;
    /// `Some(0)` is rejected.
    pub fn with_capacity(capacity: Option<usize>) -> Result<Self, StoreError> {
        match capacity {
            None => Ok(Self::unbounded()),
            Some(n) => NonZeroUsize::new(n)
                .map(Self::bounded)
                .ok_or(StoreError::ZeroCapacity),
        }
    }

    /// Stored response for a normalised key. Refreshes LRU recency.
    pub fn get(&mut self, key: &str) -> Option<&Response> {
        let hit = self.entries.get(key);
        debug!(key, hit = hit.is_some(), "cache lookup");
        hit
    }

    /// Store a response under a normalised key, replacing any previous one.
    pub fn put(&mut self, key: String, response: Response) {
        debug!(key = %key, len = self.entries.len(), "cache write");
        if let Some((evicted, _)) = self.entries.push(key.clone(), response)
            && evicted != key
        {
            debug!(evicted = %evicted, "cache evicted entry");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured bound, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity.map(NonZeroUsize::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexassist_core::{Level, ResponseKind};

    fn response(query: &str) -> Response {
        let mut r = Response::new(query, ResponseKind::General, Level::Fallback);
        r.comprehensive_answer = Some(format!("answer to {query}"));
        r
    }

    #[test]
    fn key_is_lowercased_and_trimmed() {
        assert_eq!(cache_key("  Can I Sue?  ").as_deref(), Some("can i sue?"));
        assert_eq!(cache_key("   "), None);
    }

    #[test]
    fn put_then_get() {
        let mut cache = ResponseCache::unbounded();
        cache.put("q".into(), response("q"));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("q").unwrap().comprehensive_answer.as_deref(),
            Some("answer to q")
        );
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn put_overwrites_same_key() {
        let mut cache = ResponseCache::unbounded();
        cache.put("q".into(), response("first"));
        cache.put("q".into(), response("second"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("q").unwrap().query, "second");
    }

    #[test]
    fn unbounded_keeps_everything() {
        let mut cache = ResponseCache::default();
        for i in 0..1000 {
            cache.put(format!("q{i}"), response("x"));
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn bounded_evicts_least_recently_used() {
        let mut cache = ResponseCache::with_capacity(Some(2)).unwrap();
        cache.put("a".into(), response("a"));
        cache.put("b".into(), response("b"));
        // Touch "a" so "b" becomes least recent.
        assert!(cache.get("a").is_some());
        cache.put("c".into(), response("c"));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.capacity(), Some(2));
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            ResponseCache::with_capacity(Some(0)),
            Err(StoreError::ZeroCapacity)
        ));
    }

    #[test]
    fn empty_cache() {
        let cache = ResponseCache::unbounded();
        assert!(cache.is_empty());
        assert!(!cache.contains("q"));
    }
}
