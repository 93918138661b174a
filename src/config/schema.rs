//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::cache::CachePolicy;

/// Placeholder meaning "no API key configured".
pub const UNSET: &str = "empty";

/// Root configuration for the dashboard backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream response cache timing.
    pub cache: CacheConfig,

    /// CoinGecko integration.
    pub crypto: CryptoConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Cache timing. One TTL and one cooldown apply to every key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a stored response is served without asking upstream.
    pub ttl_secs: u64,

    /// Seconds a key is kept away from upstream after a 429.
    pub cooldown_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            cooldown_secs: 600,
        }
    }
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::from_secs(self.ttl_secs, self.cooldown_secs)
    }
}

/// CoinGecko integration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Demo API key sent as `x-cg-demo-api-key`. `"empty"` disables the integration.
    pub api_key: String,

    /// API root, without trailing slash.
    pub base_url: String,

    /// Quote currency for prices and history.
    pub vs_currency: String,

    /// Comma-separated coin ids shown on the dashboard.
    pub coin_ids: String,

    /// Days of history served by the chart endpoint.
    pub history_days: u32,

    /// Timeout for price and listing requests, in seconds.
    pub timeout_secs: u64,

    /// Timeout for history requests, in seconds.
    pub history_timeout_secs: u64,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            api_key: UNSET.to_string(),
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            coin_ids: "bitcoin,solana,ethereum,litecoin".to_string(),
            history_days: 30,
            timeout_secs: 5,
            history_timeout_secs: 10,
        }
    }
}

impl CryptoConfig {
    /// True when a usable API key is configured.
    pub fn has_api_key(&self) -> bool {
        is_set(&self.api_key)
    }

    /// Configured coin ids, trimmed, blanks dropped.
    pub fn coin_id_list(&self) -> Vec<String> {
        self.coin_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// True unless `value` is blank or the `"empty"` placeholder.
pub fn is_set(value: &str) -> bool {
    !value.is_empty() && value != UNSET
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.cooldown_secs, 600);
        assert_eq!(config.crypto.vs_currency, "usd");
        assert!(!config.crypto.has_api_key());
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_partial_toml() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [crypto]
            api_key = "demo-key"
            coin_ids = " bitcoin, ,ethereum "

            [cache]
            ttl_secs = 60
            "#,
        )
        .unwrap();

        assert!(config.crypto.has_api_key());
        assert_eq!(config.crypto.coin_id_list(), vec!["bitcoin", "ethereum"]);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.cooldown_secs, 600);
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    }

    #[test]
    fn test_is_set() {
        assert!(!is_set(""));
        assert!(!is_set("empty"));
        assert!(is_set("abc"));
    }
}
