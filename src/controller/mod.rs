//! Controller: the event dispatch table.
//!
//! The host delivers three lifecycle events. Each registered handler takes
//! the event and returns a "wait until" future the host must drive to
//! completion before it considers the phase (or the response) finished.
//!
//! ```text
//! Event::Install      ──► LifecycleManager::install   ──► Installed(report)
//! Event::Activate     ──► LifecycleManager::activate  ──► Activated(report)
//! Event::Fetch(req)   ──► RequestRouter::route        ──► Responded(outcome)
//!                         (production only)
//! ```
//!
//! In local development no fetch handler is registered:
//! [`Controller::dispatch`] returns `None` and the host performs the request
//! itself, unmodified.

mod builder;

pub use builder::{Skjold, SkjoldBuilder};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::environment::EnvironmentMode;
use crate::lifecycle::{ActivationReport, InstallReport, LifecycleManager};
use crate::router::{RequestRouter, RouteOutcome};
use crate::types::Request;
use crate::{Result, SkjoldError};

/// Lifecycle or request event delivered by the host.
#[derive(Debug, Clone)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Install => EventKind::Install,
            Self::Activate => EventKind::Activate,
            Self::Fetch(_) => EventKind::Fetch,
        }
    }
}

/// Dispatch table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Activate,
    Fetch,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Fetch => "fetch",
        };
        f.write_str(name)
    }
}

/// What a handler's future resolves to.
#[derive(Debug)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(ActivationReport),
    Responded(RouteOutcome),
}

/// Future the host waits on before finishing a lifecycle phase or
/// delivering a response.
pub type WaitUntil = BoxFuture<'static, Result<EventOutcome>>;

/// Uniform handler signature: event in, wait-until future out.
pub type Handler = Arc<dyn Fn(Event) -> WaitUntil + Send + Sync>;

/// The assembled controller for one deployed build.
pub struct Controller {
    mode: EnvironmentMode,
    handlers: HashMap<EventKind, Handler>,
    lifecycle: Arc<LifecycleManager>,
    router: Arc<RequestRouter>,
}

impl Controller {
    pub(crate) fn new(
        mode: EnvironmentMode,
        lifecycle: Arc<LifecycleManager>,
        router: Arc<RequestRouter>,
    ) -> Self {
        let mut handlers: HashMap<EventKind, Handler> = HashMap::new();
        handlers.insert(EventKind::Install, install_handler(lifecycle.clone()));
        handlers.insert(EventKind::Activate, activate_handler(lifecycle.clone()));
        if !mode.is_local_development() {
            handlers.insert(EventKind::Fetch, fetch_handler(router.clone()));
        }
        Self {
            mode,
            handlers,
            lifecycle,
            router,
        }
    }

    pub fn mode(&self) -> EnvironmentMode {
        self.mode
    }

    /// Whether a handler is registered for `kind`.
    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// The handler registered for `kind`, if any.
    pub fn handler(&self, kind: EventKind) -> Option<Handler> {
        self.handlers.get(&kind).cloned()
    }

    /// Hand `event` to its handler.
    ///
    /// Returns `None` when no handler is registered; the host then applies
    /// its default behaviour (for fetch: plain network pass-through).
    pub fn dispatch(&self, event: Event) -> Option<WaitUntil> {
        let handler = self.handlers.get(&event.kind())?;
        Some(handler(event))
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn router(&self) -> &RequestRouter {
        &self.router
    }
}

fn install_handler(lifecycle: Arc<LifecycleManager>) -> Handler {
    Arc::new(move |event| {
        let lifecycle = lifecycle.clone();
        async move {
            expect_kind(&event, EventKind::Install)?;
            lifecycle.install().await.map(EventOutcome::Installed)
        }
        .boxed()
    })
}

fn activate_handler(lifecycle: Arc<LifecycleManager>) -> Handler {
    Arc::new(move |event| {
        let lifecycle = lifecycle.clone();
        async move {
            expect_kind(&event, EventKind::Activate)?;
            lifecycle.activate().await.map(EventOutcome::Activated)
        }
        .boxed()
    })
}

fn fetch_handler(router: Arc<RequestRouter>) -> Handler {
    Arc::new(move |event| {
        let router = router.clone();
        async move {
            match event {
                Event::Fetch(request) => router.route(&request).await.map(EventOutcome::Responded),
                other => Err(mismatch(EventKind::Fetch, other.kind())),
            }
        }
        .boxed()
    })
}

fn expect_kind(event: &Event, expected: EventKind) -> Result<()> {
    let actual = event.kind();
    if actual == expected {
        Ok(())
    } else {
        Err(mismatch(expected, actual))
    }
}

fn mismatch(expected: EventKind, actual: EventKind) -> SkjoldError {
    SkjoldError::Host(format!("{expected} handler received a {actual} event"))
}
