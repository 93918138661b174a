//! Admin API.
//!
//! # Data Flow
//! ```text
//! /admin/* request
//!     → auth.rs (bearer key check)
//!     → handlers.rs (status, cache summary)
//! ```
//!
//! # Design Decisions
//! - Mounted only when `admin.enabled` is set
//! - Read-only: the cache can be inspected, never edited

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use crate::http::server::AppState;
use self::auth::admin_auth;
use self::handlers::{get_cache, get_status};

/// Routes under `/admin`, guarded by the admin API key.
pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/cache", get(get_cache))
        .route_layer(middleware::from_fn_with_state(state, admin_auth))
}
