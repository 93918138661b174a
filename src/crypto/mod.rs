//! CoinGecko integration.
//!
//! # Data Flow
//! ```text
//! /api/crypto-* handler
//!     → service.rs (build cache keys, reshape payloads)
//!     → cache::ResponseCache::resolve (fresh / cooldown / fetch)
//!     → client.rs (one HTTP request, status-aware errors)
//! ```

pub mod catalog;
pub mod client;
pub mod service;
pub mod types;

pub use catalog::CoinCatalog;
pub use client::CoinGeckoClient;
pub use service::{is_valid_coin_id, CryptoService};
pub use types::{MarketChart, PricePoint, UpstreamError};
