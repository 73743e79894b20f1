//! Builder for assembling a [`Controller`]

use std::sync::Arc;

use reqwest::Url;
use tracing::info;

use super::Controller;
use crate::config::ControllerConfig;
use crate::environment::EnvironmentMode;
use crate::host::{Host, NoopHost};
use crate::lifecycle::LifecycleManager;
use crate::network::{HttpNetwork, Network};
use crate::router::{AssetStrategy, RequestRouter};
use crate::storage::{CacheStorage, MemoryCacheStorage};
use crate::{Result, SkjoldError};

/// Main entry point for creating controllers.
pub struct Skjold;

impl Skjold {
    /// Create a new builder for configuring the controller.
    pub fn builder() -> SkjoldBuilder {
        SkjoldBuilder::new()
    }
}

/// Builder for configuring controller instances.
///
/// Only the origin is required. Storage defaults to [`MemoryCacheStorage`],
/// network to [`HttpNetwork`], and host to [`NoopHost`].
pub struct SkjoldBuilder {
    origin: Option<Url>,
    config: ControllerConfig,
    mode: Option<EnvironmentMode>,
    storage: Option<Arc<dyn CacheStorage>>,
    network: Option<Arc<dyn Network>>,
    host: Option<Arc<dyn Host>>,
}

impl SkjoldBuilder {
    pub fn new() -> Self {
        Self {
            origin: None,
            config: ControllerConfig::default(),
            mode: None,
            storage: None,
            network: None,
            host: None,
        }
    }

    /// The controller's own location. Classifies the environment and
    /// anchors relative manifest paths.
    pub fn origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_tag(mut self, tag: impl Into<String>) -> Self {
        self.config = self.config.cache_tag(tag);
        self
    }

    pub fn precache<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.precache(paths);
        self
    }

    pub fn root_fallback(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.root_fallback(path);
        self
    }

    pub fn strategy(mut self, strategy: AssetStrategy) -> Self {
        self.config = self.config.strategy(strategy);
        self
    }

    pub fn skip_waiting(mut self, enabled: bool) -> Self {
        self.config = self.config.skip_waiting(enabled);
        self
    }

    /// Override environment classification (normally derived from the origin).
    pub fn environment(mut self, mode: EnvironmentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn network(mut self, network: Arc<dyn Network>) -> Self {
        self.network = Some(network);
        self
    }

    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Build the controller.
    pub fn build(self) -> Result<Controller> {
        let origin = self
            .origin
            .ok_or_else(|| SkjoldError::Configuration("origin is required".to_string()))?;
        self.config.validate()?;

        let mode = self
            .mode
            .unwrap_or_else(|| EnvironmentMode::from_origin(&origin));
        let manifest = self.config.manifest_urls(&origin)?;
        let root_fallback = self.config.root_fallback_url(&origin)?;

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryCacheStorage::new()));
        let network = self
            .network
            .unwrap_or_else(|| Arc::new(HttpNetwork::new()));
        let host = self.host.unwrap_or_else(|| Arc::new(NoopHost));

        info!(
            mode = mode.as_str(),
            cache_tag = %self.config.cache_tag,
            strategy = self.config.strategy.as_str(),
            precache = manifest.len(),
            "controller configured"
        );

        let lifecycle = Arc::new(LifecycleManager::new(
            mode,
            self.config.cache_tag.clone(),
            manifest,
            self.config.skip_waiting,
            storage.clone(),
            network.clone(),
            host,
        ));
        let router = Arc::new(RequestRouter::new(
            storage,
            network,
            self.config.cache_tag,
            &root_fallback,
            self.config.strategy,
        ));

        Ok(Controller::new(mode, lifecycle, router))
    }
}

impl Default for SkjoldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
