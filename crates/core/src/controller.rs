//! The search overlay state machine.
//!
//! ```text
//!   Closed ──open()──▶ Opening{spinner} ──all loaded (+delay)──▶ Open
//!     ▲                    │                                       │
//!     │                    └──load failure──▶ Failed                │
//!     └──────────────────── close() ◀──────────────────────────────┘
//! ```
//!
//! The controller owns all session state (dependency load progress, whether
//! the overlay has been presented before, the search gateway). It is created
//! at page load and lives until [`OverlayEvent::Unload`]; closing the overlay
//! only resets visibility, so re-opening within a session is immediate.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::{OverlayConfig, SearchCredentials};
use crate::error::{ConfigError, LoadError, QueryError};
use crate::event::{self, EventReceiver, EventSender, OverlayEvent};
use crate::gateway::{SearchConnector, SearchGateway};
use crate::loader::{DependencyLoader, Readiness, ScriptFetcher};
use crate::presenter::{OverlayPresenter, Surface};
use crate::render::ResultsRenderer;
use crate::types::{Dependency, Key, OverlayState, ResultSet, Target, UserInput};

/// Whether the event loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Counters over the lifetime of one page session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ready_transitions: usize,
    pub presentations: usize,
    pub queries_sent: usize,
    pub stale_results: usize,
}

pub struct Controller<S> {
    config: OverlayConfig,
    credentials: SearchCredentials,
    state: OverlayState,
    loader: DependencyLoader,
    presenter: OverlayPresenter<S>,
    connector: Arc<dyn SearchConnector>,
    gateway: Option<Arc<SearchGateway>>,
    /// Set after the first presentation; selects the zero-delay path afterwards.
    session_ready: bool,
    open_generation: u64,
    query_seq: u64,
    /// Queries spawned whose result has not come back yet, stale ones included.
    queries_in_flight: usize,
    draining: bool,
    stats: SessionStats,
    events: EventSender,
}

impl<S: Surface> Controller<S> {
    /// Initialise session state for a page. Fails when no search index is configured.
    pub fn new(
        config: OverlayConfig,
        surface: S,
        fetcher: Arc<dyn ScriptFetcher>,
        connector: Arc<dyn SearchConnector>,
    ) -> Result<(Self, EventReceiver), ConfigError> {
        let credentials = config.search.clone().ok_or(ConfigError::SearchDisabled)?;
        let (events, rx) = event::channel();
        let loader = DependencyLoader::new(&Dependency::ALL, fetcher, events.clone());
        let presenter =
            OverlayPresenter::new(surface, config.presentation.backdrop_fade, events.clone());
        info!(index = credentials.index_name.as_str(), "Search overlay installed");
        let controller = Self {
            config,
            credentials,
            state: OverlayState::Closed,
            loader,
            presenter,
            connector,
            gateway: None,
            session_ready: false,
            open_generation: 0,
            query_seq: 0,
            queries_in_flight: 0,
            draining: false,
            stats: SessionStats::default(),
            events,
        };
        Ok((controller, rx))
    }

    /// Handle for delivering events (user input, unload) from outside the loop.
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn loader(&self) -> &DependencyLoader {
        &self.loader
    }

    pub fn presenter(&self) -> &OverlayPresenter<S> {
        &self.presenter
    }

    pub fn is_session_ready(&self) -> bool {
        self.session_ready
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Process events until unload, then hand back the surface.
    pub async fn run(mut self, mut rx: EventReceiver) -> S {
        while let Some(event) = rx.recv().await {
            if self.handle(event) == Flow::Stop {
                break;
            }
        }
        info!(stats = ?self.stats, "Search overlay session ended");
        self.presenter.into_surface()
    }

    /// Apply one event. Must run inside a tokio runtime: background work is spawned from here.
    pub fn handle(&mut self, event: OverlayEvent) -> Flow {
        match event {
            OverlayEvent::Input(input) => self.on_input(input),
            OverlayEvent::DependencyLoaded(dependency) => {
                if self.loader.mark_loaded(dependency) == Readiness::Ready {
                    self.on_ready();
                }
            }
            OverlayEvent::DependencyFailed(error) => self.on_load_failure(error),
            OverlayEvent::PresentationDue { generation } => {
                let current = matches!(self.state, OverlayState::Opening { .. })
                    && generation == self.open_generation;
                if current {
                    self.present();
                } else {
                    debug!(generation, state = ?self.state, "Discarding stale presentation");
                }
            }
            OverlayEvent::BackdropFaded { generation } => {
                self.presenter.finish_backdrop_fade(generation);
            }
            OverlayEvent::QueryFinished { seq, outcome } => self.on_query_finished(seq, outcome),
            OverlayEvent::Unload => return Flow::Stop,
            OverlayEvent::Drain => {
                debug!(queries = self.queries_in_flight, state = ?self.state, "Input ended, draining");
                self.draining = true;
            }
        }
        if self.draining && self.is_idle() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// No query result or presentation is still on its way.
    pub fn is_idle(&self) -> bool {
        self.queries_in_flight == 0 && !matches!(self.state, OverlayState::Opening { .. })
    }

    fn on_input(&mut self, input: UserInput) {
        match input {
            UserInput::Click(Target::OpenTrigger) => self.open(),
            UserInput::Click(Target::CloseTrigger) => self.close(),
            // Clicks on modal content bubble up through the backdrop; only
            // a click whose target is the backdrop itself closes.
            UserInput::Click(Target::Backdrop) => self.close(),
            UserInput::Click(Target::ModalContent | Target::Page) => {}
            UserInput::KeyUp { key: Key::Char('s' | 'S'), focus } => {
                if !focus.is_text_field() && self.state == OverlayState::Closed {
                    self.open();
                }
            }
            UserInput::KeyUp { key: Key::Escape, .. } => {
                if matches!(self.state, OverlayState::Open | OverlayState::Failed) {
                    self.close();
                }
            }
            UserInput::KeyUp { .. } => {}
            UserInput::Submit(text) => self.submit_query(text),
        }
    }

    pub fn open(&mut self) {
        if self.state != OverlayState::Closed {
            debug!(state = ?self.state, "Open ignored");
            return;
        }
        self.open_generation += 1;

        if let Some(dependency) = self.loader.failed() {
            // No retry within a session: show the failure again.
            debug!(%dependency, "Dependency failed earlier in this session");
            self.show_failure();
            return;
        }

        if self.loader.is_ready() {
            // Loaded while closed; the first presentation still waits out its delay.
            let spinner_shown = !self.session_ready;
            self.state = OverlayState::Opening { spinner_shown };
            if spinner_shown {
                self.presenter.show_spinner();
            }
            self.ensure_gateway();
            self.schedule_presentation();
            return;
        }

        self.state = OverlayState::Opening { spinner_shown: true };
        self.presenter.show_spinner();
        let started = self.loader.ensure_all();
        debug!(started, pending = self.loader.pending(), "Opening, waiting on dependencies");
    }

    pub fn close(&mut self) {
        if self.state == OverlayState::Closed {
            return;
        }
        self.presenter.hide_spinner();
        self.presenter.hide_notice();
        self.presenter.hide_modal();
        self.presenter.hide_backdrop();
        self.presenter.blur_input();
        debug!(from = ?self.state, "Overlay closed");
        self.state = OverlayState::Closed;
    }

    pub fn submit_query(&mut self, text: String) {
        if self.state != OverlayState::Open {
            debug!(state = ?self.state, "Query ignored, overlay not open");
            return;
        }
        let Some(gateway) = self.gateway.clone() else {
            warn!("Overlay open without a search gateway");
            return;
        };
        self.query_seq += 1;
        self.queries_in_flight += 1;
        self.stats.queries_sent += 1;
        let seq = self.query_seq;
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = gateway.query(&text).await;
            let _ = events.send(OverlayEvent::QueryFinished { seq, outcome });
        });
    }

    fn ensure_gateway(&mut self) {
        if self.gateway.is_none() {
            let gateway = SearchGateway::connect(self.connector.as_ref(), &self.credentials);
            self.gateway = Some(Arc::new(gateway));
        }
    }

    fn on_ready(&mut self) {
        self.stats.ready_transitions += 1;
        info!("All dependencies loaded");
        self.ensure_gateway();

        if matches!(self.state, OverlayState::Opening { .. }) {
            self.schedule_presentation();
        }
    }

    /// Present now on a zero delay, else once the delay for the current open attempt elapses.
    fn schedule_presentation(&mut self) {
        let delay = self.presentation_delay();
        if delay.is_zero() {
            self.present();
            return;
        }
        let generation = self.open_generation;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(OverlayEvent::PresentationDue { generation });
        });
    }

    fn presentation_delay(&self) -> Duration {
        if self.session_ready {
            Duration::ZERO
        } else {
            self.config.presentation.first_open_delay
        }
    }

    fn present(&mut self) {
        self.presenter.hide_spinner();
        self.presenter.show_backdrop();
        self.presenter.show_modal();
        self.presenter.focus_input();
        self.state = OverlayState::Open;
        self.session_ready = true;
        self.stats.presentations += 1;
        debug!(generation = self.open_generation, "Overlay presented");
    }

    fn on_load_failure(&mut self, error: LoadError) {
        if !self.loader.mark_failed(&error) {
            return;
        }
        error!(dependency = %error.dependency, location = error.location, reason = error.reason.as_str(), "Search unavailable for this session");
        if matches!(self.state, OverlayState::Opening { .. }) {
            self.show_failure();
        }
    }

    fn show_failure(&mut self) {
        self.presenter.hide_spinner();
        self.presenter.show_backdrop();
        self.presenter.show_notice(&self.config.messages.load_failed);
        self.state = OverlayState::Failed;
    }

    fn on_query_finished(&mut self, seq: u64, outcome: Result<ResultSet, QueryError>) {
        self.queries_in_flight = self.queries_in_flight.saturating_sub(1);
        if seq != self.query_seq {
            self.stats.stale_results += 1;
            debug!(seq, latest = self.query_seq, "Dropping superseded query result");
            return;
        }
        let renderer = ResultsRenderer::new(&self.config.messages, &self.config.locale);
        let instruction = match outcome {
            Ok(results) => {
                debug!(hits = results.hits.len(), total = results.total_hits, "Query answered");
                renderer.render(&results)
            }
            Err(e) => {
                warn!(error = %e, "Search query failed");
                renderer.render_failure()
            }
        };
        self.presenter.render(&instruction);
    }
}
