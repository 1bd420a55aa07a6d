//! # bibtex-search
//!
//! Search academic paper databases (ACM, Google Scholar, IEEE Xplore) and
//! exchange a chosen result for its BibTeX citation.
//!
//! ## Architecture
//!
//! - [`models`]: `ArticleSummary`, `CitationText` and the `SourceKind` enumerator
//! - [`sources`]: one adapter per database behind the [`Source`] trait, and the
//!   [`SourceRegistry`] dispatcher
//! - [`utils`]: shared HTTP client
//! - [`config`]: configuration file and environment overrides
//! - [`ui`]: spinner and picker formatting for the binary
//!
//! ```rust,no_run
//! use bibtex_search::{retrieve, search, SourceKind};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let articles = search(SourceKind::Acm, "bayou").await?;
//! if let Some(article) = articles.first() {
//!     println!("{}", retrieve(SourceKind::Acm, &article.id).await?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{ArticleSummary, CitationText, SourceKind};
pub use sources::{Source, SourceError, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Search `source` for `query` using the production endpoints.
pub async fn search(source: SourceKind, query: &str) -> Result<Vec<ArticleSummary>, SourceError> {
    SourceRegistry::new()?.search(source, query).await
}

/// Retrieve the BibTeX citation for `id` from `source` using the production endpoints.
pub async fn retrieve(source: SourceKind, id: &str) -> Result<CitationText, SourceError> {
    SourceRegistry::new()?.retrieve(source, id).await
}
