//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Cache, upstream client and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID from the HTTP layer is attached to every request span
//! - Metric updates are no-ops until a recorder is installed, so tests need no setup

pub mod logging;
pub mod metrics;
