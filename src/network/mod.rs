//! Network access.
//!
//! The router and the install step never talk to a transport directly; they
//! go through [`Network`]. [`HttpNetwork`] is the reqwest-backed default.

mod http;

pub use http::HttpNetwork;

use async_trait::async_trait;

use crate::Result;
use crate::types::{Request, Response};

/// Performs a request against the real network.
///
/// Implementations return `Err(SkjoldError::Network(_))` for transport
/// failures only. A response with a non-2xx status is still `Ok`; deciding
/// what a 404 means is the router's job.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}
