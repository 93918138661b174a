//! Dashboard API handlers.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::cache::CacheSource;
use crate::config::schema::is_set;
use crate::crypto::client::API_KEY_HEADER;
use crate::crypto::is_valid_coin_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Response header telling the client how the payload was obtained.
pub const X_CACHE: &str = "x-cache";

fn with_source(source: CacheSource, body: serde_json::Value) -> Response {
    let mut response = (StatusCode::OK, Json(body)).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(X_CACHE),
        HeaderValue::from_static(source.as_str()),
    );
    response
}

fn finish(route: &'static str, result: Result<Response, ApiError>) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(route, status = %e.status(), body = %e.body(), "Request degraded");
            e.into_response()
        }
    };
    metrics::record_request(route, response.status().as_u16());
    response
}

/// `GET /api/crypto-price`
pub async fn crypto_price(State(state): State<AppState>) -> Response {
    finish("crypto_price", current_prices(&state).await)
}

async fn current_prices(state: &AppState) -> Result<Response, ApiError> {
    if !state.crypto.config().has_api_key() {
        return Err(ApiError::not_configured("data"));
    }

    let resolved = state
        .crypto
        .current_prices()
        .await
        .map_err(|e| ApiError::from_resolve("Failed to get crypto price", &e, "data"))?;

    Ok(with_source(resolved.source, json!({ "data": resolved.value })))
}

/// Query string accepted by the history route.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub x_cg_demo_api_key: Option<String>,
}

/// `GET /api/crypto-history/{coin_id}`
pub async fn crypto_history(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let result = match query {
        Ok(Query(query)) => history(&state, &coin_id, query, &headers).await,
        Err(rejection) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid query string: {}", rejection.body_text()),
            "prices",
        )),
    };
    finish("crypto_history", result)
}

async fn history(
    state: &AppState,
    coin_id: &str,
    query: HistoryQuery,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let config = state.crypto.config();

    // Header first, then query string, then configuration.
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|key| !key.is_empty())
        .or(query.x_cg_demo_api_key.filter(|key| !key.is_empty()))
        .unwrap_or_else(|| config.api_key.clone());

    if !is_set(&api_key) {
        return Err(ApiError::not_configured("prices"));
    }
    if !is_valid_coin_id(coin_id) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid coin id: {coin_id}"),
            "prices",
        ));
    }

    let resolved = state
        .crypto
        .history(coin_id, &api_key)
        .await
        .map_err(|e| ApiError::from_resolve("Failed to fetch crypto prices", &e, "prices"))?;

    Ok(with_source(
        resolved.source,
        json!({
            "coin": coin_id,
            "vs_currency": config.vs_currency,
            "days": config.history_days,
            "prices": resolved.value.prices,
        }),
    ))
}

/// `GET /api/crypto-config`
pub async fn crypto_config(State(state): State<AppState>) -> Response {
    let response = Json(state.crypto.catalog()).into_response();
    metrics::record_request("crypto_config", response.status().as_u16());
    response
}

/// `GET /api/crypto-coins`
pub async fn crypto_coins(State(state): State<AppState>) -> Response {
    finish("crypto_coins", coin_list(&state).await)
}

async fn coin_list(state: &AppState) -> Result<Response, ApiError> {
    if !state.crypto.config().has_api_key() {
        return Err(ApiError::not_configured("data"));
    }

    let resolved = state
        .crypto
        .coin_list()
        .await
        .map_err(|e| ApiError::from_resolve("Failed to get coin ID", &e, "data"))?;

    Ok(with_source(resolved.source, json!({ "data": resolved.value })))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
