//! Skjold - offline cache controller for single-page applications
//!
//! Skjold decides, for every request a single-page application makes,
//! whether to answer from the network, from a versioned local cache, or from
//! a blend of both. It owns the policy only: storage, transport and the host
//! runtime's lifecycle controls are injected behind traits.
//!
//! - **Environment classification** — loopback and `.local` origins run in
//!   local development mode: nothing is cached and old caches are purged.
//! - **Lifecycle** — install optionally seeds a cache generation from a
//!   precache manifest; activation deletes every stale generation.
//! - **Routing** — navigations are network-first with a cached fallback and a
//!   synthesized `503 Offline`; other requests use stale-while-revalidate or
//!   cache-first.
//!
//! # Example
//!
//! ```rust,no_run
//! use skjold::{AssetStrategy, Event, EventOutcome, Request, Skjold};
//! use reqwest::Url;
//!
//! #[tokio::main]
//! async fn main() -> skjold::Result<()> {
//!     let controller = Skjold::builder()
//!         .origin(Url::parse("https://app.example.com/sw.js").unwrap())
//!         .cache_tag("app-cache-3f2a9c")
//!         .strategy(AssetStrategy::StaleWhileRevalidate)
//!         .build()?;
//!
//!     if let Some(wait) = controller.dispatch(Event::Install) {
//!         wait.await?;
//!     }
//!     if let Some(wait) = controller.dispatch(Event::Activate) {
//!         wait.await?;
//!     }
//!
//!     let request = Request::navigate(Url::parse("https://app.example.com/").unwrap());
//!     if let Some(wait) = controller.dispatch(Event::Fetch(request)) {
//!         if let EventOutcome::Responded(outcome) = wait.await? {
//!             println!("{} from {:?}", outcome.response.status(), outcome.source);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod environment;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod network;
pub mod router;
pub mod storage;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use config::ControllerConfig;
pub use controller::{
    Controller, Event, EventKind, EventOutcome, Handler, Skjold, SkjoldBuilder, WaitUntil,
};
pub use environment::{EnvironmentMode, is_local_hostname};
pub use error::{Result, SkjoldError};
pub use host::{Host, NoopHost};
pub use lifecycle::{ActivationReport, InstallReport, LifecycleManager};
pub use network::{HttpNetwork, Network};
pub use router::{AssetStrategy, RequestRouter, ResponseSource, RouteOutcome};
pub use storage::{CacheGeneration, CacheStorage, MemoryCacheStorage};
pub use types::{Request, RequestKey, RequestMode, Response};
