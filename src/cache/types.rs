//! Cache types and error definitions.

use std::time::{Duration, Instant};
use thiserror::Error;

/// Default time an entry is served without contacting upstream.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default quarantine window after upstream answered "too many requests".
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(600);

/// Global timing policy shared by every key in a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a stored value counts as fresh.
    pub ttl: Duration,
    /// How long a key stays quarantined after a rate-limit failure.
    pub cooldown: Duration,
}

impl CachePolicy {
    /// Build a policy from whole seconds, as found in the config file.
    pub fn from_secs(ttl_secs: u64, cooldown_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            cooldown: Duration::from_secs(cooldown_secs),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// A stored upstream response.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload.
    pub value: V,
    /// When the payload was written.
    pub stored_at: Instant,
}

/// Last time upstream told us to back off for a key.
#[derive(Debug, Clone, Copy)]
pub struct CooldownRecord {
    /// When the rate-limit failure was observed.
    pub triggered_at: Instant,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// Served from cache within the TTL.
    Fresh,
    /// Fetched from upstream by this call.
    Fetched,
    /// Served from cache past its TTL because upstream failed or is cooling down.
    Stale,
}

impl CacheSource {
    /// Short label used for metrics and response headers.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheSource::Fresh => "fresh",
            CacheSource::Fetched => "fetched",
            CacheSource::Stale => "stale",
        }
    }
}

/// A value returned by [`ResponseCache::resolve_detailed`](super::ResponseCache::resolve_detailed).
#[derive(Debug, Clone)]
pub struct Resolved<V> {
    /// The payload.
    pub value: V,
    /// How it was obtained.
    pub source: CacheSource,
}

impl<V> Resolved<V> {
    pub(crate) fn new(value: V, source: CacheSource) -> Self {
        Self { value, source }
    }
}

/// Errors surfaced by the cache when no value can be produced.
///
/// The upstream failure is carried unchanged so callers can inspect it.
#[derive(Debug, Error)]
pub enum ResolveError<E> {
    /// Key is cooling down and nothing was ever stored for it.
    #[error("rate limited and no cached data available")]
    NoDataAvailable,

    /// Upstream answered with a rate-limit signal and nothing was stored.
    #[error("upstream rate limited: {0}")]
    RateLimited(E),

    /// Upstream failed for another reason and nothing was stored.
    #[error("upstream fetch failed: {0}")]
    Fetch(E),
}

impl<E> ResolveError<E> {
    /// The failure raised by the fetch operation, if this error carries one.
    pub fn upstream(&self) -> Option<&E> {
        match self {
            ResolveError::NoDataAvailable => None,
            ResolveError::RateLimited(e) | ResolveError::Fetch(e) => Some(e),
        }
    }

    /// Consume the error, returning the fetch operation's failure if any.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            ResolveError::NoDataAvailable => None,
            ResolveError::RateLimited(e) | ResolveError::Fetch(e) => Some(e),
        }
    }

    /// True when this failure means "back off", either now or recently.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ResolveError::NoDataAvailable | ResolveError::RateLimited(_))
    }
}
