//! Answers queries from a JSON export of the hosted index.
//!
//! The export is the array of records pushed to the index. Matching is plain
//! case-insensitive term containment over title and excerpt; records keep
//! their export order, which is the index's ranking for this offline copy.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use searchlight_core::config::SearchCredentials;
use searchlight_core::error::QueryError;
use searchlight_core::gateway::{SearchBackend, SearchConnector};
use searchlight_core::types::{ResultSet, SearchResult};
use tracing::info;

use crate::surface::strip_tags;

pub fn load_export(path: &Path) -> Result<Vec<SearchResult>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let records: Vec<SearchResult> =
        serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "Loaded index export");
    Ok(records)
}

struct Record {
    hit: SearchResult,
    haystack: String,
}

pub struct StaticIndexConnector {
    records: Arc<Vec<Record>>,
}

impl StaticIndexConnector {
    pub fn new(hits: Vec<SearchResult>) -> Self {
        let records = hits
            .into_iter()
            .map(|hit| {
                let haystack = format!("{} {}", hit.title, strip_tags(&hit.excerpt_html)).to_lowercase();
                Record { hit, haystack }
            })
            .collect();
        Self { records: Arc::new(records) }
    }
}

impl SearchConnector for StaticIndexConnector {
    fn connect(&self, credentials: &SearchCredentials) -> Arc<dyn SearchBackend> {
        Arc::new(StaticIndex {
            records: Arc::clone(&self.records),
            hits_per_page: credentials.hits_per_page,
        })
    }
}

struct StaticIndex {
    records: Arc<Vec<Record>>,
    hits_per_page: usize,
}

#[async_trait]
impl SearchBackend for StaticIndex {
    async fn search(&self, text: &str) -> Result<ResultSet, QueryError> {
        let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let matching: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| terms.iter().all(|t| r.haystack.contains(t.as_str())))
            .collect();
        let hits = matching.iter().take(self.hits_per_page).map(|r| r.hit.clone()).collect();
        Ok(ResultSet::new(hits, matching.len()))
    }
}

/// Used when no export is given: every query is rejected.
pub struct UnreachableConnector;

struct Unreachable;

#[async_trait]
impl SearchBackend for Unreachable {
    async fn search(&self, _text: &str) -> Result<ResultSet, QueryError> {
        Err(QueryError::Network("no index export configured (use --index)".into()))
    }
}

impl SearchConnector for UnreachableConnector {
    fn connect(&self, _credentials: &SearchCredentials) -> Arc<dyn SearchBackend> {
        Arc::new(Unreachable)
    }
}
