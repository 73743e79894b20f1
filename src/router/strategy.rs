//! Fetch strategy selection

use serde::Deserialize;

/// Strategy applied to non-navigation requests.
///
/// Chosen once at construction; the two variants are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetStrategy {
    /// Network first; refresh the cache on 2xx; fall back to the cached copy
    /// on network failure or a non-2xx answer.
    #[default]
    StaleWhileRevalidate,
    /// Cache first; on a miss, serve the network response without storing it.
    /// Pairs with a precache manifest that seeds the generation at install.
    CacheFirst,
}

impl AssetStrategy {
    /// Metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaleWhileRevalidate => "stale_while_revalidate",
            Self::CacheFirst => "cache_first",
        }
    }
}

/// Label used for navigation cache lookups.
pub(crate) const NETWORK_FIRST: &str = "network_first";

/// Where a routed response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthesized `503 Offline` navigation response.
    Offline,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Cache => "cache",
            Self::Offline => "offline",
        }
    }
}
