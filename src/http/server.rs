//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the dashboard API handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Mount the admin API when enabled
//! - Serve on a bound listener until shutdown is signalled

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tick::Clock;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::admin_router;
use crate::cache::ResponseCache;
use crate::config::DashboardConfig;
use crate::crypto::{CoinGeckoClient, CryptoService};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub cache: ResponseCache,
    pub crypto: CryptoService,
}

impl AppState {
    /// Build state around an existing cache.
    ///
    /// Fails only when the HTTP client cannot be constructed.
    pub fn new(config: DashboardConfig, cache: ResponseCache) -> Result<Self, reqwest::Error> {
        let crypto_config = Arc::new(config.crypto.clone());
        let client = CoinGeckoClient::new(&crypto_config)?;
        let crypto = CryptoService::new(client, cache.clone(), crypto_config);

        Ok(Self {
            config: Arc::new(config),
            cache,
            crypto,
        })
    }
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server with a fresh cache built from the configured policy.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: DashboardConfig) -> Result<Self, reqwest::Error> {
        let cache = ResponseCache::new(config.cache.policy(), Clock::new_tokio());
        Ok(Self::with_state(AppState::new(config, cache)?))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/crypto-price", get(handlers::crypto_price))
            .route("/api/crypto-history/{coin_id}", get(handlers::crypto_history))
            .route("/api/crypto-config", get(handlers::crypto_config))
            .route("/api/crypto-coins", get(handlers::crypto_coins));

        if state.config.admin.enabled {
            router = router.merge(admin_router(state.clone()));
        }

        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

        router
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin_enabled = self.state.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server(config: DashboardConfig) -> HttpServer {
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = server(DashboardConfig::default()).router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let app = server(DashboardConfig::default()).router();
        let response = app
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_admin_not_mounted_by_default() {
        let app = server(DashboardConfig::default()).router();
        let response = app
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
