//! Upstream response cache with rate-limit cooldown and stale fallback.
//!
//! # Data Flow
//! ```text
//! handler
//!     → key.rs (endpoint + sorted params → CacheKey)
//!     → resolve.rs (decide: fresh / cooldown / fetch)
//!         → store.rs (entry map, TTL freshness)
//!         → cooldown.rs (cooldown map)
//!         → classify.rs (success / rate limited / other failure)
//!     → value, or ResolveError for the handler to render
//! ```
//!
//! # Design Decisions
//! - One store per process, built at startup and injected into handlers
//! - Entry and cooldown maps share a single lock; the lock is never held across a fetch
//! - Entries are never evicted; the key space is small and fixed by configuration
//! - No request coalescing: concurrent misses on one key may each call upstream

pub mod classify;
pub mod cooldown;
pub mod key;
pub mod resolve;
pub mod store;
pub mod types;

pub use classify::{is_rate_limited, FetchOutcome, UpstreamFailure};
pub use key::{derive_key, CacheKey};
pub use store::{CacheSummary, CooldownStatus, ResponseCache};
pub use types::{CachePolicy, CacheSource, ResolveError, Resolved, DEFAULT_COOLDOWN, DEFAULT_TTL};
