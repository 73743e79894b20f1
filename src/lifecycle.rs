//! Cache lifecycle: install and activation.
//!
//! # Install
//!
//! | mode        | manifest  | effect                                        |
//! |-------------|-----------|-----------------------------------------------|
//! | development | any       | skip waiting, no cache writes                 |
//! | production  | non-empty | fetch every entry, then seed the generation   |
//! | production  | empty     | no cache writes (router populates lazily)     |
//!
//! Precaching is all-or-nothing: every manifest entry is fetched before the
//! first write, and a write failure deletes a generation the install created,
//! so a half-seeded generation is never left behind as an activation
//! candidate. A generation that already existed under the tag belongs to the
//! active build and is left in place.
//!
//! # Activation
//!
//! Production deletes every generation except the current tag and claims
//! open pages. Development deletes every generation, deregisters the
//! controller and then claims pages, giving each reload a clean slate.
//! Deletions run concurrently and are all joined before activation reports
//! completion. Any failure fails the phase; retrying is the host's business.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::try_join_all;
use reqwest::Url;
use tracing::{info, instrument, warn};

use crate::environment::EnvironmentMode;
use crate::host::Host;
use crate::network::Network;
use crate::storage::CacheStorage;
use crate::telemetry;
use crate::types::{Request, RequestKey, Response};
use crate::{Result, SkjoldError};

/// Outcome of a completed install step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Whether the host was asked to skip the waiting phase.
    pub skipped_waiting: bool,
    /// Number of manifest entries stored.
    pub precached: usize,
}

/// Outcome of a completed activation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Generations deleted, sorted by name.
    pub deleted: Vec<String>,
    /// Whether the controller deregistered itself.
    pub unregistered: bool,
    /// Whether open pages were claimed.
    pub claimed: bool,
}

/// Install and activation policy for one deployed build.
pub struct LifecycleManager {
    mode: EnvironmentMode,
    cache_tag: String,
    manifest: Vec<Url>,
    skip_waiting: bool,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    host: Arc<dyn Host>,
}

impl LifecycleManager {
    pub fn new(
        mode: EnvironmentMode,
        cache_tag: impl Into<String>,
        manifest: Vec<Url>,
        skip_waiting: bool,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        host: Arc<dyn Host>,
    ) -> Self {
        Self {
            mode,
            cache_tag: cache_tag.into(),
            manifest,
            skip_waiting,
            storage,
            network,
            host,
        }
    }

    pub fn mode(&self) -> EnvironmentMode {
        self.mode
    }

    /// Run the install step.
    #[instrument(skip(self), fields(mode = self.mode.as_str(), cache_tag = %self.cache_tag))]
    pub async fn install(&self) -> Result<InstallReport> {
        if self.mode.is_local_development() {
            self.host.skip_waiting().await?;
            return Ok(InstallReport {
                skipped_waiting: true,
                precached: 0,
            });
        }

        let precached = if self.manifest.is_empty() {
            0
        } else {
            self.precache().await?
        };

        if self.skip_waiting {
            self.host.skip_waiting().await?;
        }

        info!(precached, "install complete");
        Ok(InstallReport {
            skipped_waiting: self.skip_waiting,
            precached,
        })
    }

    /// Fetch the whole manifest, then seed the generation.
    ///
    /// Entries sharing a cache key are fetched and stored once. A write
    /// failure only discards the generation when this install created it;
    /// an existing generation under the same tag is still being served.
    async fn precache(&self) -> Result<usize> {
        let mut seen = HashSet::new();
        let distinct: Vec<&Url> = self
            .manifest
            .iter()
            .filter(|url| seen.insert(RequestKey::get(url)))
            .collect();
        let entries = try_join_all(distinct.into_iter().map(|url| self.fetch_entry(url))).await?;

        let existed = self.storage.keys().await?.contains(&self.cache_tag);
        let generation = self.storage.open(&self.cache_tag).await?;
        let count = entries.len();
        for (key, response) in entries {
            if let Err(e) = generation.put(key, response).await {
                if existed {
                    warn!(error = %e, "precache write failed, keeping existing generation");
                } else if let Err(cleanup) = self.storage.delete(&self.cache_tag).await {
                    warn!(error = %cleanup, "failed to discard partial generation");
                }
                return Err(e);
            }
        }

        metrics::counter!(telemetry::PRECACHED_ENTRIES_TOTAL).increment(count as u64);
        Ok(count)
    }

    async fn fetch_entry(&self, url: &Url) -> Result<(RequestKey, Response)> {
        let request = Request::get(url.clone());
        let response = self
            .network
            .fetch(&request)
            .await
            .map_err(|e| SkjoldError::Precache {
                path: url.path().to_string(),
                reason: e.to_string(),
            })?;
        if !response.is_ok() {
            return Err(SkjoldError::Precache {
                path: url.path().to_string(),
                reason: format!("unexpected status {}", response.status()),
            });
        }
        Ok((request.key(), response))
    }

    /// Run the activation step.
    #[instrument(skip(self), fields(mode = self.mode.as_str(), cache_tag = %self.cache_tag))]
    pub async fn activate(&self) -> Result<ActivationReport> {
        let names = self.storage.keys().await?;

        if self.mode.is_local_development() {
            let deleted = self.delete_all(names).await?;
            self.host.unregister().await?;
            info!("controller deregistered");
            self.host.claim_clients().await?;
            return Ok(ActivationReport {
                deleted,
                unregistered: true,
                claimed: true,
            });
        }

        let stale = names
            .into_iter()
            .filter(|name| *name != self.cache_tag)
            .collect();
        let deleted = self.delete_all(stale).await?;
        self.host.claim_clients().await?;
        Ok(ActivationReport {
            deleted,
            unregistered: false,
            claimed: true,
        })
    }

    /// Delete `names` concurrently; completes once every deletion resolved.
    async fn delete_all(&self, mut names: Vec<String>) -> Result<Vec<String>> {
        try_join_all(names.iter().map(|name| self.storage.delete(name))).await?;
        names.sort();
        for name in &names {
            info!(generation = %name, "deleted cache generation");
        }
        metrics::counter!(telemetry::GENERATIONS_DELETED_TOTAL).increment(names.len() as u64);
        Ok(names)
    }
}
