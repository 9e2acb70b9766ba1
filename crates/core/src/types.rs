use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Presentation smoothing applied the first time the overlay opens in a session.
pub const DEFAULT_FIRST_OPEN_DELAY_MS: u64 = 750;

/// Duration of the backdrop fade-out before it is removed and scrolling restored.
pub const DEFAULT_BACKDROP_FADE_MS: u64 = 400;

/// Number of hits the hosted index returns per page unless configured otherwise.
pub const DEFAULT_HITS_PER_PAGE: usize = 20;

/// Placeholder in the "many results" message replaced by the hit count.
pub const COUNT_PLACEHOLDER: &str = "{n}";

// ---------------------------------------------------------------------------
// Runtime dependencies
// ---------------------------------------------------------------------------

/// An external runtime module that must finish loading before the modal is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// Locale-aware date formatting library.
    DateFormat,
    /// Client library for the hosted search index.
    SearchClient,
}

impl Dependency {
    /// Every dependency the overlay waits on, in fetch order.
    pub const ALL: [Dependency; 2] = [Dependency::DateFormat, Dependency::SearchClient];

    /// Fixed resource location of the deferred script.
    pub fn location(self) -> &'static str {
        match self {
            Dependency::DateFormat => "/assets/js/moment-with-locales.js",
            Dependency::SearchClient => "/assets/js/algoliasearch.js",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dependency::DateFormat => "date-format",
            Dependency::SearchClient => "search-client",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load progress of a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    /// The fetch failed. Stays stalled for the rest of the session; never retried.
    Failed,
}

// ---------------------------------------------------------------------------
// Overlay state
// ---------------------------------------------------------------------------

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Opening { spinner_shown: bool },
    Open,
    /// A dependency failed to load and the failure notice is on screen.
    Failed,
}

/// What the user currently sees. Exactly one of these holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayVisibility {
    Closed,
    SpinnerVisible,
    ModalVisible,
    NoticeVisible,
}

impl OverlayState {
    pub fn visibility(self) -> OverlayVisibility {
        match self {
            OverlayState::Closed => OverlayVisibility::Closed,
            OverlayState::Opening { spinner_shown: true } => OverlayVisibility::SpinnerVisible,
            // Spinner skipped: nothing new is on screen until presentation.
            OverlayState::Opening { spinner_shown: false } => OverlayVisibility::Closed,
            OverlayState::Open => OverlayVisibility::ModalVisible,
            OverlayState::Failed => OverlayVisibility::NoticeVisible,
        }
    }
}

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Structural identity of the element an event was dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    OpenTrigger,
    CloseTrigger,
    /// The backdrop element itself.
    Backdrop,
    /// Anything inside the modal dialog, which sits above the backdrop.
    ModalContent,
    Page,
}

/// Element holding keyboard focus when a key is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    TextInput,
    TextArea,
    Other,
}

impl Focus {
    pub fn is_text_field(self) -> bool {
        matches!(self, Focus::TextInput | Focus::TextArea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Click(Target),
    KeyUp { key: Key, focus: Focus },
    /// Submission of the query form with the current input value.
    Submit(String),
}

// ---------------------------------------------------------------------------
// Search payloads
// ---------------------------------------------------------------------------

/// Publication date as recorded in the index: an ISO-8601 string or unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishedDate {
    Timestamp(i64),
    Text(String),
}

/// A single hit returned by the hosted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(rename = "excerpt", default)]
    pub excerpt_html: String,
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<PublishedDate>,
    #[serde(rename = "lang", default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl SearchResult {
    /// Link to display: the primary link, else the permalink.
    pub fn href(&self) -> Option<&str> {
        self.link
            .as_deref()
            .filter(|l| !l.is_empty())
            .or_else(|| self.permalink.as_deref().filter(|l| !l.is_empty()))
    }
}

/// Ranked hits for one query plus the total hit count, which may exceed `hits.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub hits: Vec<SearchResult>,
    #[serde(rename = "nbHits")]
    pub total_hits: usize,
}

impl ResultSet {
    pub fn new(hits: Vec<SearchResult>, total_hits: usize) -> Self {
        Self { hits, total_hits }
    }
}
