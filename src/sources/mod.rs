//! Source adapters with a trait-based architecture.
//!
//! This module defines the [`Source`] trait that every paper database adapter
//! implements. Each adapter performs one request per call (two for Google
//! Scholar retrieval), parses the body, and returns normalized data. There is
//! no shared state between adapters and no cross-call caching.
//!
//! The [`SourceRegistry`] maps each [`SourceKind`] to its adapter and is the
//! dispatch point for [`search`](SourceRegistry::search) and
//! [`retrieve`](SourceRegistry::retrieve).
//!
//! # Adding a Source
//!
//! 1. Add a variant to [`SourceKind`]
//! 2. Create a struct that implements `Source`
//! 3. Register it in `SourceRegistry::from_config()`

mod acm;
mod google_scholar;
mod ieee_xplore;
mod registry;

pub mod mock;

pub use acm::{AcmSource, ACM_BASE_URL};
pub use google_scholar::{GoogleScholarSource, GOOGLE_SCHOLAR_BASE_URL};
pub use ieee_xplore::{IeeeXploreSource, IEEE_BASE_URL, IEEE_DEFAULT_SESSION_COOKIE};
pub use mock::MockSource;
pub use registry::SourceRegistry;

use crate::models::{ArticleSummary, CitationText, SourceKind};
use async_trait::async_trait;

/// The Source trait defines the interface for a paper database adapter.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Which enumerator value this adapter serves
    fn kind(&self) -> SourceKind;

    /// Human-readable name of this source
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// Search for articles matching the query.
    ///
    /// A query with no matches yields an empty vector, not an error.
    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>, SourceError>;

    /// Exchange an id from [`search`](Source::search) for its BibTeX text
    async fn retrieve(&self, id: &str) -> Result<CitationText, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// API error from the source (non-2xx status)
    #[error("API error: {0}")]
    Api(String),

    /// Parsing error (JSON, HTML, missing element)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source token not in the enumerator
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Compile a CSS selector known at build time.
///
/// Selector syntax errors are programming errors, but they are still surfaced
/// as [`SourceError::Parse`] rather than panicking.
pub(crate) fn selector(css: &str) -> Result<scraper::Selector, SourceError> {
    scraper::Selector::parse(css)
        .map_err(|e| SourceError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

/// Collapse the text of an element into a single trimmed string.
pub(crate) fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
