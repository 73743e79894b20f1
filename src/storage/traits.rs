//! Cache storage traits.
//!
//! The storage engine is an opaque collaborator: named generations of
//! request/response entries with list, delete, match and put primitives.
//! The lifecycle manager and router only ever talk to these traits.
//!
//! Operations are atomic per key from the caller's point of view. Writes are
//! overwrites, so concurrent writes to the same key resolve as last write
//! wins and a write that lands after its originating request went away is
//! harmless.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{RequestKey, Response};

/// The set of named cache generations.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open the generation called `name`, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheGeneration>>;

    /// Names of every existing generation.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Delete the generation called `name`.
    ///
    /// Returns `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;
}

/// A single named generation of cached entries.
#[async_trait]
pub trait CacheGeneration: Send + Sync {
    /// Generation name (the cache tag).
    fn name(&self) -> &str;

    /// Look up an entry. Returns a fresh copy on hit, `None` on miss.
    async fn match_key(&self, key: &RequestKey) -> Result<Option<Response>>;

    /// Store `response` under `key`, replacing any previous entry.
    async fn put(&self, key: RequestKey, response: Response) -> Result<()>;

    /// Look up each key in order and return the first hit.
    async fn match_with_fallback(&self, keys: &[RequestKey]) -> Result<Option<Response>> {
        for key in keys {
            if let Some(response) = self.match_key(key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
