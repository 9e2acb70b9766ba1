//! On-demand loading of the overlay's runtime dependencies.
//!
//! Each dependency is fetched at most once per session. Completion notices
//! come back through the controller's event channel; the loader only counts
//! them down and reports when the last one lands.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::event::{EventSender, OverlayEvent};
use crate::types::{Dependency, LoadState};

/// Fetches a deferred script, e.g. by injecting a script tag and awaiting its load event.
#[async_trait]
pub trait ScriptFetcher: Send + Sync {
    async fn fetch(&self, dependency: Dependency) -> Result<(), LoadError>;
}

/// Result of recording a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Still waiting on this many dependencies.
    Pending(usize),
    /// This load was the last one outstanding. Reported exactly once per session.
    Ready,
    /// The notice did not change anything (duplicate or unexpected).
    Unchanged,
}

pub struct DependencyLoader {
    fetcher: Arc<dyn ScriptFetcher>,
    events: EventSender,
    states: Vec<(Dependency, LoadState)>,
    /// Dependencies not yet loaded. Only ever decreases.
    pending: usize,
}

impl DependencyLoader {
    pub fn new(dependencies: &[Dependency], fetcher: Arc<dyn ScriptFetcher>, events: EventSender) -> Self {
        let mut states: Vec<(Dependency, LoadState)> = Vec::with_capacity(dependencies.len());
        for &dep in dependencies {
            if !states.iter().any(|(d, _)| *d == dep) {
                states.push((dep, LoadState::Unloaded));
            }
        }
        let pending = states.len();
        Self { fetcher, events, states, pending }
    }

    pub fn state(&self, dependency: Dependency) -> Option<LoadState> {
        self.states.iter().find(|(d, _)| *d == dependency).map(|(_, s)| *s)
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_ready(&self) -> bool {
        self.pending == 0
    }

    /// First dependency whose fetch failed, if any.
    pub fn failed(&self) -> Option<Dependency> {
        self.states.iter().find(|(_, s)| *s == LoadState::Failed).map(|(d, _)| *d)
    }

    fn slot(&mut self, dependency: Dependency) -> Option<&mut LoadState> {
        self.states.iter_mut().find(|(d, _)| *d == dependency).map(|(_, s)| s)
    }

    /// Start fetching `dependency` if it has never been requested.
    ///
    /// Returns `true` when a fetch was started. Must be called inside a tokio runtime.
    pub fn ensure_loaded(&mut self, dependency: Dependency) -> bool {
        let Some(state) = self.slot(dependency) else {
            warn!(%dependency, "Unknown dependency requested");
            return false;
        };
        if *state != LoadState::Unloaded {
            return false;
        }
        *state = LoadState::Loading;

        debug!(%dependency, location = dependency.location(), "Fetching dependency");
        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match fetcher.fetch(dependency).await {
                Ok(()) => OverlayEvent::DependencyLoaded(dependency),
                Err(e) => OverlayEvent::DependencyFailed(e),
            };
            // Receiver gone means the page unloaded; nothing left to notify.
            let _ = events.send(event);
        });
        true
    }

    /// Request every dependency not yet requested. Returns the number of fetches started.
    pub fn ensure_all(&mut self) -> usize {
        let deps: Vec<Dependency> = self.states.iter().map(|(d, _)| *d).collect();
        deps.into_iter().filter(|&d| self.ensure_loaded(d)).count()
    }

    /// Record a completed fetch.
    pub fn mark_loaded(&mut self, dependency: Dependency) -> Readiness {
        let Some(state) = self.slot(dependency) else {
            return Readiness::Unchanged;
        };
        if *state != LoadState::Loading {
            debug!(%dependency, state = ?*state, "Ignoring load notice");
            return Readiness::Unchanged;
        }
        *state = LoadState::Loaded;
        self.pending -= 1;
        info!(%dependency, pending = self.pending, "Dependency loaded");
        if self.pending == 0 {
            Readiness::Ready
        } else {
            Readiness::Pending(self.pending)
        }
    }

    /// Record a failed fetch. The dependency stays stalled; it is never retried.
    pub fn mark_failed(&mut self, error: &LoadError) -> bool {
        let Some(state) = self.slot(error.dependency) else {
            return false;
        };
        if *state != LoadState::Loading {
            return false;
        }
        *state = LoadState::Failed;
        warn!(dependency = %error.dependency, error = %error, "Dependency failed to load");
        true
    }
}
