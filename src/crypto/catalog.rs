//! Static presentation data for the coins the dashboard knows how to draw.

use serde::Serialize;
use std::collections::BTreeMap;

/// Display name and icon for a coin.
#[derive(Debug, Clone, Serialize)]
pub struct CoinPresentation {
    pub name: &'static str,
    #[serde(rename = "imageUrl")]
    pub image_url: &'static str,
}

/// Chart colors for a coin.
#[derive(Debug, Clone, Serialize)]
pub struct CoinColors {
    pub border: &'static str,
    pub background: &'static str,
}

/// Payload of `/api/crypto-config`.
#[derive(Debug, Clone, Serialize)]
pub struct CoinCatalog {
    pub coin_ids: Vec<String>,
    pub coin_config: BTreeMap<&'static str, CoinPresentation>,
    pub coin_colors: BTreeMap<&'static str, CoinColors>,
}

const COINS: &[(&str, CoinPresentation, CoinColors)] = &[
    (
        "bitcoin",
        CoinPresentation {
            name: "Bitcoin",
            image_url: "https://assets.coingecko.com/coins/images/1/small/bitcoin.png",
        },
        CoinColors {
            border: "rgba(255, 140, 0, 0.8)",
            background: "rgba(247, 147, 26, 0.1)",
        },
    ),
    (
        "ethereum",
        CoinPresentation {
            name: "Ethereum",
            image_url: "https://assets.coingecko.com/coins/images/279/small/ethereum.png",
        },
        CoinColors {
            border: "rgba(59, 130, 246, 0.8)",
            background: "rgba(59, 130, 246, 0.1)",
        },
    ),
    (
        "solana",
        CoinPresentation {
            name: "Solana",
            image_url: "https://assets.coingecko.com/coins/images/4128/small/solana.png",
        },
        CoinColors {
            border: "rgba(138, 43, 226, 0.8)",
            background: "rgba(138, 43, 226, 0.1)",
        },
    ),
    (
        "litecoin",
        CoinPresentation {
            name: "Litecoin",
            image_url: "https://assets.coingecko.com/coins/images/2/small/litecoin.png",
        },
        CoinColors {
            border: "rgba(136, 136, 136, 0.8)",
            background: "rgba(191, 191, 191, 0.1)",
        },
    ),
];

impl CoinCatalog {
    pub fn new(coin_ids: Vec<String>) -> Self {
        Self {
            coin_ids,
            coin_config: COINS.iter().map(|(id, p, _)| (*id, p.clone())).collect(),
            coin_colors: COINS.iter().map(|(id, _, c)| (*id, c.clone())).collect(),
        }
    }
}
