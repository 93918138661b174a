use axum::{extract::State, Json};
use serde::Serialize;

use crate::cache::CacheSummary;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub api_key_configured: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        api_key_configured: state.config.crypto.has_api_key(),
    })
}

pub async fn get_cache(State(state): State<AppState>) -> Json<CacheSummary> {
    Json(state.cache.summary())
}
