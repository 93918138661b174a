//! CoinGecko HTTP client.
//!
//! Every method performs exactly one request and reports failures with the
//! HTTP status attached, so the cache can tell rate limiting from other errors.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;

use crate::config::schema::{is_set, CryptoConfig};
use crate::crypto::types::UpstreamError;
use crate::observability::metrics;

/// Header carrying the demo API key.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Client for the CoinGecko v3 API.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    history_timeout: Duration,
}

impl CoinGeckoClient {
    /// Create a client from the crypto config section.
    pub fn new(config: &CryptoConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("dashboard-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(http: Client, config: &CryptoConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            history_timeout: Duration::from_secs(config.history_timeout_secs),
        }
    }

    pub fn simple_price_url(&self) -> String {
        format!("{}/simple/price", self.base_url)
    }

    pub fn market_chart_url(&self, coin_id: &str) -> String {
        format!("{}/coins/{}/market_chart", self.base_url, coin_id)
    }

    pub fn coins_list_url(&self) -> String {
        format!("{}/coins/list", self.base_url)
    }

    /// Current prices for comma-separated `ids` in comma-separated `vs_currencies`.
    pub async fn simple_price(
        &self,
        ids: &str,
        vs_currencies: &str,
        api_key: &str,
    ) -> Result<Value, UpstreamError> {
        let query = [("ids", ids), ("vs_currencies", vs_currencies)];
        self.get_json("simple_price", &self.simple_price_url(), &query, api_key, self.timeout)
            .await
    }

    /// Daily price history for one coin over the last `days` days.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: &str,
        api_key: &str,
    ) -> Result<Value, UpstreamError> {
        self.chart(coin_id, vs_currency, days, api_key, self.history_timeout)
            .await
    }

    /// A short daily chart fetched alongside current prices, under the price timeout.
    pub async fn recent_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: &str,
        api_key: &str,
    ) -> Result<Value, UpstreamError> {
        self.chart(coin_id, vs_currency, days, api_key, self.timeout)
            .await
    }

    async fn chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let query = [("vs_currency", vs_currency), ("days", days), ("interval", "daily")];
        self.get_json(
            "market_chart",
            &self.market_chart_url(coin_id),
            &query,
            api_key,
            timeout,
        )
        .await
    }

    /// Every coin id CoinGecko knows about.
    pub async fn coins_list(&self, api_key: &str) -> Result<Value, UpstreamError> {
        self.get_json("coins_list", &self.coins_list_url(), &[], api_key, self.timeout)
            .await
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
        api_key: &str,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let start = Instant::now();

        let mut request = self.http.get(url).query(query).timeout(timeout);
        if is_set(api_key) {
            request = request.header(API_KEY_HEADER, api_key);
        }

        tracing::debug!(endpoint, url = %url, "Calling CoinGecko");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_request(endpoint, 0, start);
                return Err(e.into());
            }
        };

        let status = response.status();
        metrics::record_upstream_request(endpoint, status.as_u16(), start);

        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
            endpoint,
            status: status.as_u16(),
            source,
        })
    }
}
