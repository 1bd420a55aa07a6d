//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::models::{ArticleSummary, CitationText, SourceKind};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined responses.
#[derive(Debug)]
pub struct MockSource {
    kind: SourceKind,
    articles: Mutex<Vec<ArticleSummary>>,
    citation: Mutex<Option<CitationText>>,
}

impl MockSource {
    /// Create a new mock source standing in for `kind`.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            articles: Mutex::new(Vec::new()),
            citation: Mutex::new(None),
        }
    }

    /// Articles returned by every search.
    pub fn with_articles(self, articles: Vec<ArticleSummary>) -> Self {
        self.set_articles(articles);
        self
    }

    /// Citation returned by every retrieval.
    pub fn with_citation(self, citation: impl Into<CitationText>) -> Self {
        *lock(&self.citation) = Some(citation.into());
        self
    }

    /// Replace the search results.
    pub fn set_articles(&self, articles: Vec<ArticleSummary>) {
        *lock(&self.articles) = articles;
    }

    /// Clear the configured responses.
    pub fn clear(&self) {
        lock(&self.articles).clear();
        *lock(&self.citation) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Source for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, _query: &str) -> Result<Vec<ArticleSummary>, SourceError> {
        Ok(lock(&self.articles).clone())
    }

    async fn retrieve(&self, id: &str) -> Result<CitationText, SourceError> {
        lock(&self.citation)
            .clone()
            .ok_or_else(|| SourceError::Other(format!("No citation configured for '{}'", id)))
    }
}
