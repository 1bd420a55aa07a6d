//! Core data models for search results and citations.

mod article;

pub use article::{ArticleSummary, CitationText, SourceKind};
