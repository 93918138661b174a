//! Cache key derivation.

use serde::Serialize;
use std::fmt;

/// Identifies one upstream resource: an endpoint plus its request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an endpoint without parameters.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }

    /// Key for an endpoint with parameters, independent of parameter order.
    pub fn with_params<I, K, V>(endpoint: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(K, V)> = params.into_iter().collect();
        if pairs.is_empty() {
            return Self::new(endpoint);
        }
        pairs.sort_by(|a, b| {
            a.0.as_ref()
                .cmp(b.0.as_ref())
                .then_with(|| a.1.as_ref().cmp(b.1.as_ref()))
        });

        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
            .collect::<Vec<_>>()
            .join("&");

        Self(format!("{endpoint}?{query}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derive the key for an endpoint and an optional parameter set.
///
/// Without parameters (or with an empty set) the key is the endpoint verbatim.
/// Values are not URL-encoded.
pub fn derive_key<I, K, V>(endpoint: &str, params: Option<I>) -> CacheKey
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    match params {
        Some(params) => CacheKey::with_params(endpoint, params),
        None => CacheKey::new(endpoint),
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
