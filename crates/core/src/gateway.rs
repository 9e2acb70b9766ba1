//! Thin wrapper over the hosted search index.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::SearchCredentials;
use crate::error::QueryError;
use crate::types::ResultSet;

/// An index handle produced by the search-client library.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, text: &str) -> Result<ResultSet, QueryError>;
}

/// Builds index handles from page configuration. Only usable once the
/// search-client dependency has loaded.
pub trait SearchConnector: Send + Sync {
    fn connect(&self, credentials: &SearchCredentials) -> Arc<dyn SearchBackend>;
}

pub struct SearchGateway {
    index_name: String,
    backend: Arc<dyn SearchBackend>,
}

impl SearchGateway {
    pub fn connect(connector: &dyn SearchConnector, credentials: &SearchCredentials) -> Self {
        debug!(app_id = credentials.app_id.as_str(), index = credentials.index_name.as_str(), "Connecting search client");
        Self {
            index_name: credentials.index_name.clone(),
            backend: connector.connect(credentials),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Send `text` to the index as-is. Empty and whitespace-only queries are valid.
    pub async fn query(&self, text: &str) -> Result<ResultSet, QueryError> {
        debug!(index = self.index_name.as_str(), query = text, "Querying index");
        self.backend.search(text).await
    }
}
