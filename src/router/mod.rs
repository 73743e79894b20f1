//! Request routing.
//!
//! Every intercepted request in production mode goes through
//! [`RequestRouter::route`]. Navigations and everything else take different
//! paths:
//!
//! ```text
//!                     route(request)
//!                          │
//!            ┌─────────────┴──────────────┐
//!       navigation                      asset
//!            │                            │
//!     network first               AssetStrategy
//!            │                  ┌─────────┴──────────┐
//!   ok ──► store + return   StaleWhileRevalidate  CacheFirst
//!   err ─► cache(request)       │                    │
//!          ├► cache(root)    network ─► 2xx: store   cache hit ─► return
//!          └► 503 Offline     else ─► cache or       miss ─► network
//!                                     original failure       (uncached)
//! ```
//!
//! Within one request the order network → cache write → return is strict:
//! a snapshot is written before the live response is handed back. A failed
//! cache write is logged and never fails the request.

mod strategy;

pub use strategy::{AssetStrategy, ResponseSource};

use std::sync::Arc;
use std::time::Instant;

use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::network::Network;
use crate::storage::{CacheGeneration, CacheStorage};
use crate::telemetry;
use crate::types::{Request, RequestKey, Response};
use crate::Result;

use strategy::NETWORK_FIRST;

/// A routed response and where it came from.
#[derive(Debug)]
pub struct RouteOutcome {
    pub response: Response,
    pub source: ResponseSource,
}

impl RouteOutcome {
    fn new(response: Response, source: ResponseSource) -> Self {
        Self { response, source }
    }
}

/// Per-request cache selection against the single active generation.
pub struct RequestRouter {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    cache_tag: String,
    root_fallback: RequestKey,
    strategy: AssetStrategy,
}

impl RequestRouter {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        cache_tag: impl Into<String>,
        root_fallback: &Url,
        strategy: AssetStrategy,
    ) -> Self {
        Self {
            storage,
            network,
            cache_tag: cache_tag.into(),
            root_fallback: RequestKey::get(root_fallback),
            strategy,
        }
    }

    pub fn strategy(&self) -> AssetStrategy {
        self.strategy
    }

    pub fn cache_tag(&self) -> &str {
        &self.cache_tag
    }

    /// Route one intercepted request.
    ///
    /// Navigations always resolve to a response. Other requests return the
    /// original network error when neither network nor cache can serve them.
    #[instrument(skip(self, request), fields(url = %request.url(), navigation = request.is_navigation()))]
    pub async fn route(&self, request: &Request) -> Result<RouteOutcome> {
        let start = Instant::now();
        let kind = if request.is_navigation() {
            "navigation"
        } else {
            "asset"
        };

        let result = if request.is_navigation() {
            Ok(self.navigate(request).await)
        } else {
            match self.strategy {
                AssetStrategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
                AssetStrategy::CacheFirst => self.cache_first(request).await,
            }
        };

        let source = match &result {
            Ok(outcome) => outcome.source.as_str(),
            Err(_) => "error",
        };
        metrics::counter!(telemetry::FETCH_TOTAL, "kind" => kind, "source" => source).increment(1);
        metrics::histogram!(telemetry::FETCH_DURATION_SECONDS, "kind" => kind)
            .record(start.elapsed().as_secs_f64());

        result
    }

    /// Network first, then the request's cached copy, then the root
    /// fallback, then `503 Offline`.
    async fn navigate(&self, request: &Request) -> RouteOutcome {
        let key = request.key();
        match self.network.fetch(request).await {
            Ok(response) => {
                self.store(key, &response).await;
                RouteOutcome::new(response, ResponseSource::Network)
            }
            Err(e) => {
                warn!(error = %e, "navigation fetch failed, falling back to cache");
                metrics::counter!(telemetry::NETWORK_FAILURES_TOTAL, "kind" => "navigation")
                    .increment(1);
                match self
                    .lookup(&[key, self.root_fallback.clone()], NETWORK_FIRST)
                    .await
                {
                    Some(cached) => RouteOutcome::new(cached, ResponseSource::Cache),
                    None => {
                        metrics::counter!(telemetry::OFFLINE_RESPONSES_TOTAL).increment(1);
                        RouteOutcome::new(Response::offline(), ResponseSource::Offline)
                    }
                }
            }
        }
    }

    async fn stale_while_revalidate(&self, request: &Request) -> Result<RouteOutcome> {
        let key = request.key();
        let label = self.strategy.as_str();
        match self.network.fetch(request).await {
            Ok(response) if response.is_ok() => {
                self.store(key, &response).await;
                Ok(RouteOutcome::new(response, ResponseSource::Network))
            }
            Ok(response) => {
                debug!(status = response.status(), "non-ok response, trying cache");
                match self.lookup(&[key], label).await {
                    Some(cached) => Ok(RouteOutcome::new(cached, ResponseSource::Cache)),
                    None => Ok(RouteOutcome::new(response, ResponseSource::Network)),
                }
            }
            Err(e) => {
                warn!(error = %e, "asset fetch failed, falling back to cache");
                metrics::counter!(telemetry::NETWORK_FAILURES_TOTAL, "kind" => "asset")
                    .increment(1);
                match self.lookup(&[key], label).await {
                    Some(cached) => Ok(RouteOutcome::new(cached, ResponseSource::Cache)),
                    None => Err(e),
                }
            }
        }
    }

    async fn cache_first(&self, request: &Request) -> Result<RouteOutcome> {
        if let Some(cached) = self.lookup(&[request.key()], self.strategy.as_str()).await {
            return Ok(RouteOutcome::new(cached, ResponseSource::Cache));
        }
        let response = self.network.fetch(request).await.inspect_err(|_| {
            metrics::counter!(telemetry::NETWORK_FAILURES_TOTAL, "kind" => "asset").increment(1);
        })?;
        Ok(RouteOutcome::new(response, ResponseSource::Network))
    }

    async fn generation(&self) -> Result<Arc<dyn CacheGeneration>> {
        self.storage.open(&self.cache_tag).await
    }

    /// Write a snapshot of `response` under `key`. Failures are logged only.
    async fn store(&self, key: RequestKey, response: &Response) {
        let result = match self.generation().await {
            Ok(generation) => generation.put(key.clone(), response.snapshot()).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                debug!(%key, "cached response");
                metrics::counter!(telemetry::CACHE_WRITES_TOTAL).increment(1);
            }
            Err(e) => {
                warn!(%key, error = %e, "cache write failed");
                metrics::counter!(telemetry::CACHE_WRITE_FAILURES_TOTAL).increment(1);
            }
        }
    }

    /// First cached hit among `keys`. Storage errors count as a miss.
    async fn lookup(&self, keys: &[RequestKey], label: &'static str) -> Option<Response> {
        let result = match self.generation().await {
            Ok(generation) => generation.match_with_fallback(keys).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(response)) => {
                debug!(strategy = label, "cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "strategy" => label).increment(1);
                Some(response)
            }
            Ok(None) => {
                debug!(strategy = label, "cache miss");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "strategy" => label).increment(1);
                None
            }
            Err(e) => {
                warn!(strategy = label, error = %e, "cache lookup failed");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "strategy" => label).increment(1);
                None
            }
        }
    }
}
