//! CoinGecko wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::UpstreamFailure;

/// Errors that can occur when talking to CoinGecko.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Connection, timeout or body transfer failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not valid JSON.
    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        status: u16,
        source: serde_json::Error,
    },
}

impl UpstreamFailure for UpstreamError {
    fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } | UpstreamError::Decode { status, .. } => {
                Some(*status)
            }
            UpstreamError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// One `[timestamp_ms, price]` pair from a market chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub f64, pub f64);

impl PricePoint {
    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Subset of `/coins/{id}/market_chart` the dashboard uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

impl MarketChart {
    /// Read a cached payload, treating anything unexpected as an empty chart.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(chart) => chart,
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected market chart payload");
                Self::default()
            }
        }
    }

    /// Closing price of the previous day in a daily chart.
    ///
    /// With two or more points that is the second to last one; a single point is used as is.
    pub fn yesterday_price(&self) -> Option<f64> {
        match self.prices.len() {
            0 => None,
            1 => Some(self.prices[0].price()),
            n => Some(self.prices[n - 2].price()),
        }
    }
}
