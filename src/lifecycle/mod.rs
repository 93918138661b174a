//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown_signal() resolves
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber (HTTP server) stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown out to all long-running tasks
//! - In-flight requests finish before the process exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
