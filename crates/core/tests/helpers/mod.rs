//! Test harness for overlay lifecycle tests.
//!
//! Builds a `Controller` over a recording surface, a fetcher with per-dependency
//! latency, and a scripted search backend, then drives it event by event on a
//! paused tokio clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use searchlight_core::config::{OverlayConfig, SearchCredentials};
use searchlight_core::error::{LoadError, QueryError};
use searchlight_core::event::EventReceiver;
use searchlight_core::gateway::{SearchBackend, SearchConnector};
use searchlight_core::loader::ScriptFetcher;
use searchlight_core::presenter::{BackdropPaint, Surface};
use searchlight_core::render::RenderInstruction;
use searchlight_core::types::{
    Dependency, Focus, Key, OverlayState, PublishedDate, ResultSet, SearchResult, Target, UserInput,
};
use searchlight_core::{Controller, OverlayEvent};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSurface {
    pub log: Vec<String>,
    pub rendered: Vec<RenderInstruction>,
}

impl RecordingSurface {
    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| *e == entry).count()
    }
}

impl Surface for RecordingSurface {
    fn set_spinner(&mut self, visible: bool) {
        self.log.push(format!("spinner {visible}"));
    }
    fn set_modal(&mut self, visible: bool) {
        self.log.push(format!("modal {visible}"));
    }
    fn set_backdrop(&mut self, paint: BackdropPaint) {
        self.log.push(format!("backdrop {paint:?}"));
    }
    fn set_scroll_locked(&mut self, locked: bool) {
        self.log.push(format!("scroll-lock {locked}"));
    }
    fn set_input_focus(&mut self, focused: bool) {
        self.log.push(format!("focus {focused}"));
    }
    fn set_notice(&mut self, message: Option<&str>) {
        self.log.push(format!("notice {}", message.unwrap_or("-")));
    }
    fn apply(&mut self, instruction: &RenderInstruction) {
        self.log.push("render".to_string());
        self.rendered.push(instruction.clone());
    }
}

/// Completes each fetch after a fixed per-dependency latency.
pub struct DelayedFetcher {
    delays: HashMap<Dependency, Duration>,
    fail: Option<Dependency>,
    calls: Mutex<HashMap<Dependency, usize>>,
}

impl DelayedFetcher {
    pub fn calls(&self, dependency: Dependency) -> usize {
        self.calls.lock().unwrap().get(&dependency).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ScriptFetcher for DelayedFetcher {
    async fn fetch(&self, dependency: Dependency) -> Result<(), LoadError> {
        *self.calls.lock().unwrap().entry(dependency).or_insert(0) += 1;
        let delay = self.delays.get(&dependency).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        if self.fail == Some(dependency) {
            return Err(LoadError::new(dependency, "net::ERR_CONNECTION_RESET"));
        }
        Ok(())
    }
}

/// Answers known queries with canned responses after an optional latency.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<HashMap<String, (Duration, Result<ResultSet, QueryError>)>>,
    pub seen: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn respond(&self, query: &str, latency_ms: u64, outcome: Result<ResultSet, QueryError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), (Duration::from_millis(latency_ms), outcome));
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, text: &str) -> Result<ResultSet, QueryError> {
        self.seen.lock().unwrap().push(text.to_string());
        let scripted = self.responses.lock().unwrap().get(text).cloned();
        match scripted {
            Some((latency, outcome)) => {
                tokio::time::sleep(latency).await;
                outcome
            }
            None => Ok(ResultSet::new(vec![], 0)),
        }
    }
}

pub struct CountingConnector {
    backend: Arc<ScriptedBackend>,
    pub connects: AtomicUsize,
}

impl SearchConnector for CountingConnector {
    fn connect(&self, _credentials: &SearchCredentials) -> Arc<dyn SearchBackend> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.backend.clone()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct HarnessOptions {
    pub date_format_ms: u64,
    pub search_client_ms: u64,
    pub fail: Option<Dependency>,
    pub config: OverlayConfig,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        let config = OverlayConfig {
            search: Some(SearchCredentials {
                app_id: "APP".into(),
                api_key: "public".into(),
                index_name: "blog".into(),
                hits_per_page: 20,
            }),
            ..OverlayConfig::default()
        };
        Self { date_format_ms: 20, search_client_ms: 40, fail: None, config }
    }
}

pub struct TestHarness {
    pub controller: Controller<RecordingSurface>,
    pub rx: EventReceiver,
    pub fetcher: Arc<DelayedFetcher>,
    pub backend: Arc<ScriptedBackend>,
    pub connector: Arc<CountingConnector>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with(HarnessOptions::default())
    }

    pub fn with(options: HarnessOptions) -> Self {
        let fetcher = Arc::new(DelayedFetcher {
            delays: HashMap::from([
                (Dependency::DateFormat, Duration::from_millis(options.date_format_ms)),
                (Dependency::SearchClient, Duration::from_millis(options.search_client_ms)),
            ]),
            fail: options.fail,
            calls: Mutex::new(HashMap::new()),
        });
        let backend = Arc::new(ScriptedBackend::default());
        let connector = Arc::new(CountingConnector { backend: backend.clone(), connects: AtomicUsize::new(0) });
        let (controller, rx) = Controller::new(
            options.config,
            RecordingSurface::default(),
            fetcher.clone(),
            connector.clone(),
        )
        .expect("harness config enables search");
        Self { controller, rx, fetcher, backend, connector }
    }

    pub fn surface(&self) -> &RecordingSurface {
        self.controller.presenter().surface()
    }

    pub fn input(&mut self, input: UserInput) {
        self.controller.handle(OverlayEvent::Input(input));
    }

    pub fn click(&mut self, target: Target) {
        self.input(UserInput::Click(target));
    }

    pub fn key(&mut self, key: Key, focus: Focus) {
        self.input(UserInput::KeyUp { key, focus });
    }

    pub fn submit(&mut self, text: &str) {
        self.input(UserInput::Submit(text.to_string()));
    }

    /// Handle the next background event, waiting (in virtual time) for it.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.controller.handle(event);
                true
            }
            None => false,
        }
    }

    /// Handle events until the modal has been presented.
    pub async fn settle_until_open(&mut self) {
        while self.controller.state() != OverlayState::Open {
            if !self.step().await {
                break;
            }
        }
    }

    /// Handle events until nothing further arrives within ten virtual seconds.
    pub async fn settle(&mut self) {
        while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(10), self.rx.recv()).await {
            self.controller.handle(event);
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn post(title: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        link: None,
        permalink: Some(format!("/{title}/")),
        excerpt_html: format!("About <em>{title}</em>"),
        published_date: Some(PublishedDate::Text("2021-06-15T08:00:00Z".into())),
        locale: Some("en".into()),
    }
}
