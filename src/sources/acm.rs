//! ACM Digital Library source implementation.
//!
//! Scrapes the classic `results.cfm` listing for search, and the
//! `exportformats.cfm` page for BibTeX export. Neither endpoint needs an
//! API key.

use async_trait::async_trait;
use scraper::Html;

use crate::models::{ArticleSummary, CitationText, SourceKind};
use crate::sources::{element_text, selector, Source, SourceError};
use crate::utils::{send_text, HttpClient};

/// Production base URL
pub const ACM_BASE_URL: &str = "https://dl.acm.org";

/// ACM research source
#[derive(Debug, Clone)]
pub struct AcmSource {
    client: HttpClient,
    base_url: String,
}

impl AcmSource {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, ACM_BASE_URL)
    }

    /// Point the adapter at another host (mirrors, tests)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/results.cfm", self.base_url)
    }

    fn export_url(&self) -> String {
        format!("{}/exportformats.cfm", self.base_url)
    }
}

#[async_trait]
impl Source for AcmSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Acm
    }

    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>, SourceError> {
        let url = self.search_url();
        tracing::debug!(source = "acm", %url, query, "searching");

        let request = self.client.get(&url).query(&[("query", query)]);
        let body = send_text(request, "search ACM").await?;

        let articles = parse_search_results(&body)?;
        tracing::debug!(source = "acm", count = articles.len(), "parsed search results");
        Ok(articles)
    }

    async fn retrieve(&self, id: &str) -> Result<CitationText, SourceError> {
        let url = self.export_url();
        tracing::debug!(source = "acm", %url, id, "retrieving reference");

        let request = self
            .client
            .get(&url)
            .query(&[("id", id), ("expformat", "bibtex")]);
        let body = send_text(request, "retrieve ACM reference").await?;

        parse_citation(&body, id)
    }
}

/// Extract every result block from a `results.cfm` page.
///
/// A page without `.details` blocks means no matches. A block without a
/// citation link is malformed and fails the whole parse.
pub(crate) fn parse_search_results(html: &str) -> Result<Vec<ArticleSummary>, SourceError> {
    let document = Html::parse_document(html);
    let details = selector(".details")?;
    let title_link = selector(".title > a[href^=\"citation\"]")?;
    let author_link = selector(".authors > a")?;

    document
        .select(&details)
        .map(|block| {
            let link = block.select(&title_link).next().ok_or_else(|| {
                SourceError::Parse("ACM result without a citation link".to_string())
            })?;

            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| SourceError::Parse("ACM citation link without href".to_string()))?;

            let authors = block
                .select(&author_link)
                .map(|a| element_text(&a))
                .collect::<Vec<_>>()
                .join(", ");

            Ok(ArticleSummary::new(
                citation_id(href)?,
                element_text(&link),
                authors,
            ))
        })
        .collect()
}

/// Pull the `id` query parameter out of a relative `citation.cfm?...` link.
fn citation_id(href: &str) -> Result<String, SourceError> {
    let query = href.rsplit('?').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| SourceError::Parse(format!("No id in ACM citation link '{}'", href)))
}

/// Text of the `<pre id="{id}">` block on the export page; empty if absent.
pub(crate) fn parse_citation(html: &str, id: &str) -> Result<CitationText, SourceError> {
    let document = Html::parse_document(html);
    let css = format!("pre[id=\"{}\"]", id.replace('\\', "\\\\").replace('"', "\\\""));
    let pre = selector(&css)?;

    Ok(document
        .select(&pre)
        .next()
        .map(|element| element_text(&element))
        .unwrap_or_default())
}
