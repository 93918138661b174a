//! Dashboard backend library.
//!
//! Serves cryptocurrency price widgets from CoinGecko through a resilient
//! response cache: fresh entries are reused, rate limits trigger a cooldown,
//! and stale data is served whenever the upstream cannot deliver.

// Core subsystems
pub mod cache;
pub mod config;
pub mod crypto;
pub mod http;

// Operator surfaces
pub mod admin;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use cache::{CacheKey, CachePolicy, CacheSource, ResolveError, Resolved, ResponseCache};
pub use config::DashboardConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
