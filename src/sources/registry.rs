//! Registry mapping each source enumerator value to its adapter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{
    acm::AcmSource, google_scholar::GoogleScholarSource, ieee_xplore::IeeeXploreSource, Source,
    SourceError,
};
use crate::config::Config;
use crate::models::{ArticleSummary, CitationText, SourceKind};
use crate::utils::HttpClient;

/// Registry for all available sources
///
/// Dispatches `search`/`retrieve` to the adapter registered for a
/// [`SourceKind`]. Holds no state beyond the adapters themselves.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: HashMap<SourceKind, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a registry with every source pointed at its production endpoint
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&Config::default())
    }

    /// Create a registry from configuration (endpoints, HTTP settings, cookie)
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::with_options(
            &config.http.user_agent,
            config.http.timeout_secs.map(Duration::from_secs),
        )?;

        let mut registry = Self::empty();
        registry.register(Arc::new(AcmSource::with_base_url(
            client.clone(),
            &config.endpoints.acm,
        )));
        registry.register(Arc::new(GoogleScholarSource::with_base_url(
            client.clone(),
            &config.endpoints.google_scholar,
        )));
        registry.register(Arc::new(
            IeeeXploreSource::with_base_url(client, &config.endpoints.ieee)
                .session_cookie(&config.ieee.session_cookie),
        ));

        Ok(registry)
    }

    /// Create a registry with no sources registered
    pub fn empty() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a source, replacing any adapter already serving its kind
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.kind(), source);
    }

    /// Get the adapter for a source
    pub fn get(&self, kind: SourceKind) -> Option<&Arc<dyn Source>> {
        self.sources.get(&kind)
    }

    /// Get the adapter for a source, returning an error if not registered
    pub fn get_required(&self, kind: SourceKind) -> Result<&Arc<dyn Source>, SourceError> {
        self.get(kind)
            .ok_or_else(|| SourceError::UnknownSource(kind.as_str().to_string()))
    }

    /// Get the adapter for a source token; unrecognized tokens select ACM
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Source>, SourceError> {
        self.get_required(SourceKind::lookup(name))
    }

    /// Search one source
    pub async fn search(
        &self,
        kind: SourceKind,
        query: &str,
    ) -> Result<Vec<ArticleSummary>, SourceError> {
        self.get_required(kind)?.search(query).await
    }

    /// Retrieve a citation from one source
    pub async fn retrieve(&self, kind: SourceKind, id: &str) -> Result<CitationText, SourceError> {
        self.get_required(kind)?.retrieve(id).await
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
