//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use dashboard_backend::config::DashboardConfig;
use dashboard_backend::http::HttpServer;
use dashboard_backend::lifecycle::Shutdown;

/// Failure mode the mock upstream is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Healthy,
    RateLimited,
    Broken,
}

/// A stand-in for CoinGecko that counts calls and can be switched into failure modes.
#[derive(Clone, Default)]
pub struct MockUpstream {
    calls: Arc<AtomicU32>,
    rate_limited: Arc<AtomicBool>,
    broken: Arc<AtomicBool>,
    last_api_key: Arc<Mutex<Option<String>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_mode(&self, mode: Mode) {
        self.rate_limited.store(mode == Mode::RateLimited, Ordering::SeqCst);
        self.broken.store(mode == Mode::Broken, Ordering::SeqCst);
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.last_api_key.lock().unwrap().clone()
    }
}

async fn mock_handler(State(mock): State<MockUpstream>, uri: Uri, headers: HeaderMap) -> Response {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    *mock.last_api_key.lock().unwrap() = headers
        .get("x-cg-demo-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if mock.rate_limited.load(Ordering::SeqCst) {
        return (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").into_response();
    }
    if mock.broken.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let path = uri.path();
    let body = if path.ends_with("/simple/price") {
        json!({
            "bitcoin": { "usd": 65000.0 },
            "ethereum": { "usd": 3500.0 },
        })
    } else if path.ends_with("/market_chart") {
        json!({ "prices": [[1.0, 64000.0], [2.0, 64500.0], [3.0, 65000.0]] })
    } else if path.ends_with("/coins/list") {
        json!([{ "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" }])
    } else {
        return StatusCode::NOT_FOUND.into_response();
    };

    axum::Json(body).into_response()
}

/// Start the mock upstream on an ephemeral port. Returns its base URL.
pub async fn start_mock_upstream() -> (String, MockUpstream) {
    let mock = MockUpstream::default();
    let app = Router::new()
        .fallback(mock_handler)
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/v3"), mock)
}

/// Config pointed at `base_url` with an API key and only bitcoin configured.
pub fn test_config(base_url: &str) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.crypto.base_url = base_url.to_string();
    config.crypto.api_key = "configured-key".to_string();
    config.crypto.coin_ids = "bitcoin".to_string();
    config.crypto.timeout_secs = 2;
    config.crypto.history_timeout_secs = 2;
    config
}

/// Start the dashboard server. Returns its base URL and the shutdown handle.
pub async fn start_server(config: DashboardConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    (format!("http://{addr}"), shutdown)
}
