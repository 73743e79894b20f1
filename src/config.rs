//! Controller configuration.
//!
//! The controller's constants (cache tag, precache manifest, root fallback,
//! asset strategy) are fixed for the life of a deployed build. They are
//! usually compiled in from a TOML document produced by the deploy pipeline:
//!
//! ```rust
//! # use skjold::{AssetStrategy, ControllerConfig};
//! let config = ControllerConfig::from_toml_str(r#"
//!     cache_tag = "app-cache-3f2a9c"
//!     precache = ["/", "/index.html", "/app.wasm"]
//!     strategy = "cache-first"
//! "#).unwrap();
//! assert_eq!(config.strategy, AssetStrategy::CacheFirst);
//! ```
//!
//! Nothing is read from the filesystem or environment at runtime.

use reqwest::Url;
use serde::Deserialize;

use crate::router::AssetStrategy;
use crate::{Result, SkjoldError};

/// Compiled-in controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Name of the active cache generation (default: `runtime-cache-v1`).
    /// Must change with every deployed build.
    #[serde(default = "default_cache_tag")]
    pub cache_tag: String,
    /// Paths fetched and stored at install, in order. Empty = no precaching.
    #[serde(default)]
    pub precache: Vec<String>,
    /// Path served to offline navigations with no cached copy of their own
    /// (default: `/`).
    #[serde(default = "default_root_fallback")]
    pub root_fallback: String,
    /// Strategy for non-navigation requests.
    #[serde(default)]
    pub strategy: AssetStrategy,
    /// Whether a production install supersedes the previous controller
    /// immediately (default: true). Local development always does.
    #[serde(default = "default_skip_waiting")]
    pub skip_waiting: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cache_tag: default_cache_tag(),
            precache: Vec::new(),
            root_fallback: default_root_fallback(),
            strategy: AssetStrategy::default(),
            skip_waiting: default_skip_waiting(),
        }
    }
}

fn default_cache_tag() -> String {
    "runtime-cache-v1".to_string()
}

fn default_root_fallback() -> String {
    "/".to_string()
}

fn default_skip_waiting() -> bool {
    true
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cache_tag(mut self, tag: impl Into<String>) -> Self {
        self.cache_tag = tag.into();
        self
    }

    pub fn precache<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn root_fallback(mut self, path: impl Into<String>) -> Self {
        self.root_fallback = path.into();
        self
    }

    pub fn strategy(mut self, strategy: AssetStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn skip_waiting(mut self, enabled: bool) -> Self {
        self.skip_waiting = enabled;
        self
    }

    /// Check the invariants the controller relies on.
    pub fn validate(&self) -> Result<()> {
        if self.cache_tag.trim().is_empty() {
            return Err(SkjoldError::Configuration(
                "cache_tag must not be empty".to_string(),
            ));
        }
        if !self.root_fallback.starts_with('/') || self.root_fallback.starts_with("//") {
            return Err(SkjoldError::Configuration(format!(
                "root_fallback must be an absolute path, got '{}'",
                self.root_fallback
            )));
        }
        for path in &self.precache {
            if path.trim().is_empty() {
                return Err(SkjoldError::Configuration(
                    "precache entries must not be empty".to_string(),
                ));
            }
            if Url::parse(path).is_ok() {
                return Err(SkjoldError::Configuration(format!(
                    "precache entry '{path}' must be a relative path"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the precache manifest against the controller's location.
    pub fn manifest_urls(&self, origin: &Url) -> Result<Vec<Url>> {
        self.precache
            .iter()
            .map(|path| resolve(origin, path))
            .collect()
    }

    /// Resolve the root fallback path against the controller's location.
    pub fn root_fallback_url(&self, origin: &Url) -> Result<Url> {
        resolve(origin, &self.root_fallback)
    }
}

/// Join `path` onto the controller's location. The result must stay on the
/// controller's origin.
fn resolve(origin: &Url, path: &str) -> Result<Url> {
    let url = origin
        .join(path)
        .map_err(|e| SkjoldError::Configuration(format!("cannot resolve '{path}': {e}")))?;
    if url.origin() != origin.origin() {
        return Err(SkjoldError::Configuration(format!(
            "'{path}' resolves outside the controller's origin"
        )));
    }
    Ok(url)
}
