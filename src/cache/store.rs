//! Shared cache store and its read/write primitives.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tick::Clock;

use crate::cache::key::CacheKey;
use crate::cache::types::{CacheEntry, CachePolicy, CooldownRecord};
use crate::observability::metrics;

/// Both maps live behind one lock so every decision sees a consistent pair.
#[derive(Debug)]
pub(crate) struct CacheState<V> {
    pub(crate) entries: HashMap<CacheKey, CacheEntry<V>>,
    pub(crate) cooldowns: HashMap<CacheKey, CooldownRecord>,
}

/// In-memory cache of upstream responses with rate-limit cooldowns.
///
/// Cloning is cheap and every clone shares the same store, so one instance is
/// built at startup and handed to whatever needs it.
#[derive(Debug)]
pub struct ResponseCache<V = serde_json::Value> {
    state: Arc<Mutex<CacheState<V>>>,
    policy: CachePolicy,
    clock: Clock,
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            policy: self.policy,
            clock: self.clock.clone(),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Create an empty cache that reads time from `clock`.
    pub fn new(policy: CachePolicy, clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                cooldowns: HashMap::new(),
            })),
            policy,
            clock,
        }
    }

    /// The stored value for `key`, however old it is.
    pub fn read_entry(&self, key: &CacheKey) -> Option<V> {
        self.lock().entries.get(key).map(|entry| entry.value.clone())
    }

    /// Replace (or create) the entry for `key`, stamped with the current time.
    pub fn write_entry(&self, key: &CacheKey, value: V) {
        let stored_at = self.now();
        let len = {
            let mut state = self.lock();
            state
                .entries
                .insert(key.clone(), CacheEntry { value, stored_at });
            state.entries.len()
        };
        metrics::record_cache_entries(len);
    }

    /// True if an entry exists and is younger than the TTL.
    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        let now = self.now();
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| now.saturating_duration_since(entry.stored_at) < self.policy.ttl)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time view of the store for inspection endpoints.
    pub fn summary(&self) -> CacheSummary {
        let now = self.now();
        let state = self.lock();

        let fresh = state
            .entries
            .values()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.policy.ttl)
            .count();

        let mut cooling_down: Vec<CooldownStatus> = state
            .cooldowns
            .iter()
            .filter_map(|(key, record)| {
                let age = now.saturating_duration_since(record.triggered_at);
                self.policy.cooldown.checked_sub(age).and_then(|remaining| {
                    (!remaining.is_zero()).then(|| CooldownStatus {
                        key: key.clone(),
                        remaining_secs: remaining.as_secs(),
                    })
                })
            })
            .collect();
        cooling_down.sort_by(|a, b| a.key.cmp(&b.key));

        CacheSummary {
            entries: state.entries.len(),
            fresh,
            stale: state.entries.len() - fresh,
            cooling_down,
            ttl_secs: self.policy.ttl.as_secs(),
            cooldown_secs: self.policy.cooldown.as_secs(),
        }
    }
}

impl<V> ResponseCache<V> {
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.instant()
    }

    /// Critical sections never panic, so a poisoned lock still holds consistent maps.
    pub(crate) fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    pub entries: usize,
    pub fresh: usize,
    pub stale: usize,
    pub cooling_down: Vec<CooldownStatus>,
    pub ttl_secs: u64,
    pub cooldown_secs: u64,
}

/// A key currently quarantined from upstream.
#[derive(Debug, Clone, Serialize)]
pub struct CooldownStatus {
    pub key: CacheKey,
    pub remaining_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tick::ClockControl;

    fn test_cache() -> (ResponseCache<String>, ClockControl) {
        let control = ClockControl::new();
        let cache = ResponseCache::new(CachePolicy::default(), control.to_clock());
        (cache, control)
    }

    #[test]
    fn test_read_missing_entry() {
        let (cache, _clock) = test_cache();
        let key = CacheKey::new("missing");
        assert!(cache.read_entry(&key).is_none());
        assert!(!cache.is_fresh(&key));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let (cache, _clock) = test_cache();
        let key = CacheKey::new("prices");

        cache.write_entry(&key, "v1".to_string());
        assert_eq!(cache.read_entry(&key).as_deref(), Some("v1"));
        assert!(cache.is_fresh(&key));

        cache.write_entry(&key, "v2".to_string());
        assert_eq!(cache.read_entry(&key).as_deref(), Some("v2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_freshness_boundary() {
        let (cache, clock) = test_cache();
        let key = CacheKey::new("prices");
        cache.write_entry(&key, "v1".to_string());

        clock.advance(Duration::from_secs(299));
        assert!(cache.is_fresh(&key));

        clock.advance(Duration::from_secs(1));
        assert!(!cache.is_fresh(&key));
        // Stale entries stay readable.
        assert_eq!(cache.read_entry(&key).as_deref(), Some("v1"));
    }

    #[test]
    fn test_rewrite_restamps_entry() {
        let (cache, clock) = test_cache();
        let key = CacheKey::new("prices");
        cache.write_entry(&key, "v1".to_string());

        clock.advance(Duration::from_secs(400));
        assert!(!cache.is_fresh(&key));

        cache.write_entry(&key, "v2".to_string());
        assert!(cache.is_fresh(&key));
    }

    #[test]
    fn test_clones_share_state() {
        let (cache, _clock) = test_cache();
        let other = cache.clone();
        let key = CacheKey::new("shared");

        other.write_entry(&key, "v".to_string());
        assert_eq!(cache.read_entry(&key).as_deref(), Some("v"));
    }

    #[test]
    fn test_summary_counts() {
        let (cache, clock) = test_cache();
        cache.write_entry(&CacheKey::new("old"), "a".to_string());
        clock.advance(Duration::from_secs(350));
        cache.write_entry(&CacheKey::new("new"), "b".to_string());
        cache.record_cooldown(&CacheKey::new("old"));

        let summary = cache.summary();
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.fresh, 1);
        assert_eq!(summary.stale, 1);
        assert_eq!(summary.cooling_down.len(), 1);
        assert_eq!(summary.cooling_down[0].key.as_str(), "old");
        assert_eq!(summary.cooling_down[0].remaining_secs, 600);

        clock.advance(Duration::from_secs(600));
        assert!(cache.summary().cooling_down.is_empty());
    }
}
