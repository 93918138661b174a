//! The fetch-or-fallback decision procedure.
//!
//! # Order of evaluation
//! ```text
//! fresh entry?          → serve it, no upstream call
//! key cooling down?     → serve stale entry, or NoDataAvailable; no upstream call
//! otherwise             → remember current entry, call upstream
//!     success           → store, clear cooldown, serve
//!     rate limited      → start cooldown, serve remembered entry or fail
//!     other failure     → serve remembered entry or fail
//! ```
//!
//! The store lock is only taken around map accesses, never across the fetch.
//! Concurrent callers may therefore fetch the same expired key more than once.

use std::future::Future;

use crate::cache::classify::{FetchOutcome, UpstreamFailure};
use crate::cache::key::CacheKey;
use crate::cache::store::ResponseCache;
use crate::cache::types::{CacheSource, ResolveError, Resolved};
use crate::observability::metrics;

impl<V: Clone> ResponseCache<V> {
    /// Resolve `key` to a value, calling `fetch` only when the cache cannot answer.
    pub async fn resolve<F, Fut, E>(&self, key: &CacheKey, fetch: F) -> Result<V, ResolveError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: UpstreamFailure,
    {
        self.resolve_detailed(key, fetch)
            .await
            .map(|resolved| resolved.value)
    }

    /// Like [`resolve`](Self::resolve), also reporting where the value came from.
    pub async fn resolve_detailed<F, Fut, E>(
        &self,
        key: &CacheKey,
        fetch: F,
    ) -> Result<Resolved<V>, ResolveError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: UpstreamFailure,
    {
        if self.is_fresh(key) {
            if let Some(value) = self.read_entry(key) {
                tracing::debug!(key = %key, "Serving fresh cache entry");
                metrics::record_cache_lookup("fresh");
                return Ok(Resolved::new(value, CacheSource::Fresh));
            }
        }

        if self.is_in_cooldown(key) {
            return match self.read_entry(key) {
                Some(value) => {
                    tracing::debug!(key = %key, "Key cooling down, serving stale entry");
                    metrics::record_cache_lookup("cooldown");
                    Ok(Resolved::new(value, CacheSource::Stale))
                }
                None => {
                    tracing::warn!(key = %key, "Key cooling down with nothing cached");
                    metrics::record_cache_lookup("unavailable");
                    Err(ResolveError::NoDataAvailable)
                }
            };
        }

        let previous = self.read_entry(key);

        match FetchOutcome::classify(fetch().await) {
            FetchOutcome::Success(value) => {
                self.write_entry(key, value.clone());
                if self.clear_cooldown(key) {
                    tracing::info!(key = %key, "Upstream recovered, cooldown cleared");
                }
                metrics::record_cache_lookup("fetched");
                Ok(Resolved::new(value, CacheSource::Fetched))
            }
            FetchOutcome::RateLimited(e) => {
                self.record_cooldown(key);
                tracing::warn!(
                    key = %key,
                    error = %e,
                    cooldown_secs = self.policy().cooldown.as_secs(),
                    "Upstream rate limited, entering cooldown"
                );
                fall_back(key, previous).ok_or(ResolveError::RateLimited(e))
            }
            FetchOutcome::OtherFailure(e) => {
                tracing::warn!(key = %key, error = %e, "Upstream fetch failed");
                fall_back(key, previous).ok_or(ResolveError::Fetch(e))
            }
        }
    }
}

fn fall_back<V>(key: &CacheKey, previous: Option<V>) -> Option<Resolved<V>> {
    match previous {
        Some(value) => {
            tracing::info!(key = %key, "Serving stale entry after failed fetch");
            metrics::record_cache_lookup("stale");
            Some(Resolved::new(value, CacheSource::Stale))
        }
        None => {
            metrics::record_cache_lookup("failed");
            None
        }
    }
}
