//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID, open span)
//!     → handlers.rs (pick API key, call the crypto service)
//!     → response.rs (render degraded results as JSON errors)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers never panic on upstream trouble; every failure is a JSON body
//! - `x-cache` tells the client whether data is fresh, refetched, or stale

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
