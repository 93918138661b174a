//! Per-key rate-limit cooldown bookkeeping.
//!
//! A key enters cooldown when upstream rejects a fetch for it with a
//! rate-limit signal, and leaves it once the window elapses or a later
//! fetch for the same key succeeds.

use crate::cache::key::CacheKey;
use crate::cache::store::ResponseCache;
use crate::cache::types::CooldownRecord;

impl<V> ResponseCache<V> {
    /// True if upstream rate-limited `key` less than one cooldown window ago.
    pub fn is_in_cooldown(&self, key: &CacheKey) -> bool {
        let now = self.now();
        let cooldown = self.policy().cooldown;
        self.lock()
            .cooldowns
            .get(key)
            .is_some_and(|record| now.saturating_duration_since(record.triggered_at) < cooldown)
    }

    /// Start (or restart) the cooldown window for `key`.
    pub fn record_cooldown(&self, key: &CacheKey) {
        let triggered_at = self.now();
        self.lock()
            .cooldowns
            .insert(key.clone(), CooldownRecord { triggered_at });
    }

    /// Forget any cooldown for `key`.
    ///
    /// Returns true if a record was removed.
    pub fn clear_cooldown(&self, key: &CacheKey) -> bool {
        self.lock().cooldowns.remove(key).is_some()
    }
}
