//! Cache-backed crypto price service.
//!
//! Each upstream resource is cached under its endpoint URL plus query
//! parameters. The API key is not part of the key: every caller sees the
//! same data regardless of which key fetched it.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::cache::{CacheKey, ResolveError, Resolved, ResponseCache};
use crate::config::CryptoConfig;
use crate::crypto::catalog::CoinCatalog;
use crate::crypto::client::CoinGeckoClient;
use crate::crypto::types::{MarketChart, UpstreamError};

/// Days of daily history used to find yesterday's price.
const YESTERDAY_WINDOW_DAYS: &str = "2";

pub type CryptoResult<T> = Result<Resolved<T>, ResolveError<UpstreamError>>;

/// Price data the dashboard widgets consume.
#[derive(Debug, Clone)]
pub struct CryptoService {
    client: CoinGeckoClient,
    cache: ResponseCache,
    config: Arc<CryptoConfig>,
}

impl CryptoService {
    pub fn new(client: CoinGeckoClient, cache: ResponseCache, config: Arc<CryptoConfig>) -> Self {
        Self {
            client,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// Current prices for the configured coins, each with yesterday's close.
    ///
    /// Yesterday's price is added as `<currency>_yesterday` when its history
    /// can be resolved; coins whose history fails are returned without it.
    pub async fn current_prices(&self) -> CryptoResult<Map<String, Value>> {
        let coins = self.config.coin_id_list();
        let ids = coins.join(",");
        let vs_currencies = self.config.vs_currency.as_str();
        let api_key = self.config.api_key.as_str();

        let key = CacheKey::with_params(
            &self.client.simple_price_url(),
            [("ids", ids.as_str()), ("vs_currencies", vs_currencies)],
        );
        let current = self
            .cache
            .resolve_detailed(&key, || self.client.simple_price(&ids, vs_currencies, api_key))
            .await?;

        let vs_currency = vs_currencies.split(',').next().unwrap_or(vs_currencies).trim();
        let yesterday_field = format!("{vs_currency}_yesterday");

        let mut prices = current.value.as_object().cloned().unwrap_or_default();
        for coin in &coins {
            let Some(Value::Object(info)) = prices.get_mut(coin) else {
                continue;
            };
            match self.yesterday_price(coin, vs_currency, api_key).await {
                Ok(Some(price)) => {
                    info.insert(yesterday_field.clone(), Value::from(price));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(coin = %coin, error = %e, "No history for yesterday's price");
                }
            }
        }

        Ok(Resolved::new(prices, current.source))
    }

    async fn yesterday_price(
        &self,
        coin_id: &str,
        vs_currency: &str,
        api_key: &str,
    ) -> Result<Option<f64>, ResolveError<UpstreamError>> {
        let key = self.market_chart_key(coin_id, vs_currency, YESTERDAY_WINDOW_DAYS);
        let chart = self
            .cache
            .resolve(&key, || {
                self.client
                    .recent_market_chart(coin_id, vs_currency, YESTERDAY_WINDOW_DAYS, api_key)
            })
            .await?;
        Ok(MarketChart::from_value(&chart).yesterday_price())
    }

    /// Daily history for one coin over the configured number of days.
    ///
    /// `api_key` overrides the configured key for this request only.
    pub async fn history(&self, coin_id: &str, api_key: &str) -> CryptoResult<MarketChart> {
        let vs_currency = self.config.vs_currency.as_str();
        let days = self.config.history_days.to_string();

        let key = self.market_chart_key(coin_id, vs_currency, &days);
        let chart = self
            .cache
            .resolve_detailed(&key, || {
                self.client.market_chart(coin_id, vs_currency, &days, api_key)
            })
            .await?;

        Ok(Resolved::new(MarketChart::from_value(&chart.value), chart.source))
    }

    /// The full CoinGecko coin listing.
    pub async fn coin_list(&self) -> CryptoResult<Value> {
        let key = CacheKey::new(self.client.coins_list_url());
        self.cache
            .resolve_detailed(&key, || self.client.coins_list(&self.config.api_key))
            .await
    }

    /// Presentation data for the configured coins.
    pub fn catalog(&self) -> CoinCatalog {
        CoinCatalog::new(self.config.coin_id_list())
    }

    fn market_chart_key(&self, coin_id: &str, vs_currency: &str, days: &str) -> CacheKey {
        CacheKey::with_params(
            &self.client.market_chart_url(coin_id),
            [("vs_currency", vs_currency), ("days", days), ("interval", "daily")],
        )
    }
}

/// True for ids CoinGecko can use as a path segment.
pub fn is_valid_coin_id(coin_id: &str) -> bool {
    !coin_id.is_empty()
        && coin_id.len() <= 128
        && coin_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && coin_id != "."
        && coin_id != ".."
}
