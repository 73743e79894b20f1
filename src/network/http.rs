//! reqwest-backed [`Network`] implementation

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::Network;
use crate::types::{Request, Response};
use crate::{Result, SkjoldError};

/// Fetches requests over HTTP with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpNetwork {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Reuse an existing client (connection pool, TLS config, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Set a per-request timeout. Expiry surfaces as a network failure.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for HttpNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Network for HttpNetwork {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await.map_err(SkjoldError::from)?;

        let status = resp.status();
        // Headers with non-visible ASCII are dropped from the snapshot
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp.bytes().await.map_err(SkjoldError::from)?;

        debug!(status = status.as_u16(), bytes = body.len(), "network response");

        let response = headers.into_iter().fold(
            Response::new(status.as_u16(), body.to_vec())
                .status_text(status.canonical_reason().unwrap_or_default()),
            |response, (name, value)| response.header(name, value),
        );
        Ok(response)
    }
}
