//! Host runtime lifecycle controls.
//!
//! The host owns the controller's registration and the set of open pages.
//! The lifecycle manager asks it to skip the waiting phase, claim pages and,
//! in local development, deregister the controller entirely.

use async_trait::async_trait;
use tracing::info;

use crate::Result;

/// Lifecycle controls exposed by the host runtime.
#[async_trait]
pub trait Host: Send + Sync {
    /// Supersede the previously active controller without waiting for its
    /// pages to close.
    async fn skip_waiting(&self) -> Result<()>;

    /// Take control of every open page in scope.
    async fn claim_clients(&self) -> Result<()>;

    /// Deregister this controller; the host falls back to plain network
    /// behaviour afterwards.
    async fn unregister(&self) -> Result<()>;
}

/// A [`Host`] that only logs. For embedders without lifecycle control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

#[async_trait]
impl Host for NoopHost {
    async fn skip_waiting(&self) -> Result<()> {
        info!("skip_waiting requested");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<()> {
        info!("claim_clients requested");
        Ok(())
    }

    async fn unregister(&self) -> Result<()> {
        info!("unregister requested");
        Ok(())
    }
}
