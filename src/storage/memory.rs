//! In-process cache storage backed by moka.
//!
//! One moka cache maps generation names to generations; each generation
//! holds its own unbounded moka cache of response snapshots. Entries never
//! expire on their own: generations are only ever removed by activation.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;

use super::traits::{CacheGeneration, CacheStorage};
use crate::Result;
use crate::types::{RequestKey, Response};

/// Thread-safe in-memory [`CacheStorage`].
#[derive(Clone)]
pub struct MemoryCacheStorage {
    generations: Cache<String, Arc<MemoryGeneration>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self {
            generations: Cache::builder().build(),
        }
    }

    /// Whether a generation called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.generations.contains_key(name)
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheGeneration>> {
        let generation: Arc<dyn CacheGeneration> = self
            .generations
            .get_with(name.to_string(), async {
                Arc::new(MemoryGeneration::new(name))
            })
            .await;
        Ok(generation)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .generations
            .iter()
            .map(|(name, _)| name.as_ref().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.generations.remove(name).await.is_some())
    }
}

impl Default for MemoryCacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// A generation held in memory.
pub struct MemoryGeneration {
    name: String,
    entries: Cache<RequestKey, Arc<Response>>,
}

impl MemoryGeneration {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Cache::builder().build(),
        }
    }
}

#[async_trait]
impl CacheGeneration for MemoryGeneration {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_key(&self, key: &RequestKey) -> Result<Option<Response>> {
        Ok(self.entries.get(key).await.map(|stored| stored.snapshot()))
    }

    async fn put(&self, key: RequestKey, response: Response) -> Result<()> {
        self.entries.insert(key, Arc::new(response)).await;
        Ok(())
    }
}
