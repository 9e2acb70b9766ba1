//! Overlay configuration loaded from `searchlight.toml`.
//!
//! The file is optional. Missing sections fall back to defaults, unknown keys
//! are reported with a typo suggestion, and wrongly typed values are errors.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::{
    DEFAULT_BACKDROP_FADE_MS, DEFAULT_FIRST_OPEN_DELAY_MS, DEFAULT_HITS_PER_PAGE,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Page-embedded access configuration for the hosted index. None of these are secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    pub hits_per_page: usize,
}

/// User-facing strings for the result count line and failure notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    pub zero: String,
    pub one: String,
    /// Must contain `{n}`, replaced by the hit count.
    pub other: String,
    pub unavailable: String,
    pub load_failed: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            zero: "No post found".to_string(),
            one: "1 post found".to_string(),
            other: "{n} posts found".to_string(),
            unavailable: "Search is unavailable right now".to_string(),
            load_failed: "Search could not be loaded".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub first_open_delay: Duration,
    pub backdrop_fade: Duration,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            first_open_delay: Duration::from_millis(DEFAULT_FIRST_OPEN_DELAY_MS),
            backdrop_fade: Duration::from_millis(DEFAULT_BACKDROP_FADE_MS),
        }
    }
}

/// The visitor's language settings, highest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalePreference {
    pub user_language: Option<String>,
    pub language: Option<String>,
}

impl LocalePreference {
    /// First non-empty of user language, language, then the entry's own locale.
    pub fn resolve<'a>(&'a self, entry_locale: Option<&'a str>) -> &'a str {
        [self.user_language.as_deref(), self.language.as_deref(), entry_locale]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("en")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayConfig {
    /// `None` when no index is configured; the overlay is then not installed.
    pub search: Option<SearchCredentials>,
    pub messages: MessageTable,
    pub presentation: Presentation,
    pub locale: LocalePreference,
}

impl OverlayConfig {
    pub fn is_search_enabled(&self) -> bool {
        self.search.is_some()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

const KNOWN_SECTIONS: &[&str] = &["search", "messages", "presentation", "locale"];
const SEARCH_KEYS: &[&str] = &["app_id", "api_key", "index_name", "hits_per_page"];
const MESSAGE_KEYS: &[&str] = &["zero", "one", "other", "unavailable", "load_failed"];
const PRESENTATION_KEYS: &[&str] = &["first_open_delay_ms", "backdrop_fade_ms"];
const LOCALE_KEYS: &[&str] = &["user_language", "language"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest known key within edit distance 3, if any.
fn suggest<'a>(key: &str, known: &[&'a str]) -> Option<&'a str> {
    known
        .iter()
        .copied()
        .min_by_key(|k| edit_distance(key, k))
        .filter(|k| edit_distance(key, k) <= 3)
}

fn warn_unknown_keys(scope: &str, table: &toml::Table, known: &[&str]) {
    for key in table.keys() {
        if known.contains(&key.as_str()) {
            continue;
        }
        match suggest(key, known) {
            Some(suggestion) => warn!(
                scope,
                key = key.as_str(),
                suggestion,
                "Unknown config key, did you mean '{suggestion}'?"
            ),
            None => warn!(
                scope,
                key = key.as_str(),
                "Unknown config key (known keys: {})",
                known.join(", ")
            ),
        }
    }
}

fn qualified(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

fn get_str(table: &toml::Table, section: &str, key: &str) -> Result<Option<String>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::InvalidValue { key: qualified(section, key), expected: "a string" }),
    }
}

fn get_u64(table: &toml::Table, section: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(n)) if *n >= 0 => Ok(Some(*n as u64)),
        Some(_) => Err(ConfigError::InvalidValue {
            key: qualified(section, key),
            expected: "a non-negative integer",
        }),
    }
}

fn section<'a>(root: &'a toml::Table, name: &str) -> Result<Option<&'a toml::Table>, ConfigError> {
    match root.get(name) {
        None => Ok(None),
        Some(toml::Value::Table(t)) => Ok(Some(t)),
        Some(_) => Err(ConfigError::InvalidValue { key: name.to_string(), expected: "a table" }),
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<OverlayConfig, ConfigError> {
    let root: toml::Table = content.parse()?;
    warn_unknown_keys("root", &root, KNOWN_SECTIONS);

    let mut config = OverlayConfig::default();

    if let Some(search) = section(&root, "search")? {
        warn_unknown_keys("search", search, SEARCH_KEYS);
        let app_id = get_str(search, "search", "app_id")?;
        let api_key = get_str(search, "search", "api_key")?;
        let index_name = get_str(search, "search", "index_name")?;
        let hits_per_page = get_u64(search, "search", "hits_per_page")?
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_HITS_PER_PAGE);

        match (app_id, api_key, index_name) {
            (Some(app_id), Some(api_key), Some(index_name))
                if !app_id.is_empty() && !index_name.is_empty() =>
            {
                config.search = Some(SearchCredentials { app_id, api_key, index_name, hits_per_page });
            }
            _ => warn!("[search] needs app_id, api_key and index_name; search overlay disabled"),
        }
    }

    if let Some(messages) = section(&root, "messages")? {
        warn_unknown_keys("messages", messages, MESSAGE_KEYS);
        let m = &mut config.messages;
        for (key, slot) in [
            ("zero", &mut m.zero),
            ("one", &mut m.one),
            ("other", &mut m.other),
            ("unavailable", &mut m.unavailable),
            ("load_failed", &mut m.load_failed),
        ] {
            if let Some(value) = get_str(messages, "messages", key)? {
                *slot = value;
            }
        }
        if !m.other.contains(crate::types::COUNT_PLACEHOLDER) {
            warn!(message = m.other.as_str(), "messages.other has no {{n}} placeholder");
        }
    }

    if let Some(presentation) = section(&root, "presentation")? {
        warn_unknown_keys("presentation", presentation, PRESENTATION_KEYS);
        if let Some(ms) = get_u64(presentation, "presentation", "first_open_delay_ms")? {
            config.presentation.first_open_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = get_u64(presentation, "presentation", "backdrop_fade_ms")? {
            config.presentation.backdrop_fade = Duration::from_millis(ms);
        }
    }

    if let Some(locale) = section(&root, "locale")? {
        warn_unknown_keys("locale", locale, LOCALE_KEYS);
        config.locale.user_language = get_str(locale, "locale", "user_language")?;
        config.locale.language = get_str(locale, "locale", "language")?;
    }

    Ok(config)
}

/// Load configuration from a file. A missing file yields defaults (search disabled).
pub fn load_config(path: &Path) -> Result<OverlayConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(OverlayConfig::default());
    }
    debug!(path = %path.display(), "Loading config");
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    parse_config(&content)
}
