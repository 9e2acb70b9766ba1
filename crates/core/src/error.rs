use std::path::PathBuf;

use thiserror::Error;

use crate::types::Dependency;

/// A deferred script could not be fetched. Terminal for the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to load {dependency} from {location}: {reason}")]
pub struct LoadError {
    pub dependency: Dependency,
    pub location: &'static str,
    pub reason: String,
}

impl LoadError {
    pub fn new(dependency: Dependency, reason: impl Into<String>) -> Self {
        Self { dependency, location: dependency.location(), reason: reason.into() }
    }
}

/// The remote search call was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("search index unreachable: {0}")]
    Network(String),

    #[error("search index returned an error: {0}")]
    Remote(String),

    #[error("malformed search response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config key '{key}' must be {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("no search index configured: [search] needs app_id, api_key and index_name")]
    SearchDisabled,
}
