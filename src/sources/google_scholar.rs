//! Google Scholar research source implementation.
//!
//! Google Scholar has no public API; this adapter scrapes the result page.
//! Retrieval is a two-step exchange: the `output=cite` page for a cluster id
//! links to a BibTeX export, which is then fetched verbatim.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::models::{ArticleSummary, CitationText, SourceKind};
use crate::sources::{element_text, selector, Source, SourceError};
use crate::utils::{send_text, HttpClient};

/// Production base URL
pub const GOOGLE_SCHOLAR_BASE_URL: &str = "https://scholar.google.com";

/// Google Scholar research source
#[derive(Debug, Clone)]
pub struct GoogleScholarSource {
    client: HttpClient,
    base_url: String,
}

impl GoogleScholarSource {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GOOGLE_SCHOLAR_BASE_URL)
    }

    /// Point the adapter at another host (mirrors, tests)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/scholar", self.base_url)
    }
}

#[async_trait]
impl Source for GoogleScholarSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Google
    }

    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>, SourceError> {
        let url = self.search_url();
        tracing::debug!(source = "google", %url, query, "searching");

        let request = self.client.get(&url).query(&[("q", query), ("hl", "en")]);
        let body = send_text(request, "search Google Scholar").await?;

        let articles = parse_search_results(&body)?;
        tracing::debug!(source = "google", count = articles.len(), "parsed search results");
        Ok(articles)
    }

    async fn retrieve(&self, id: &str) -> Result<CitationText, SourceError> {
        let url = self.search_url();
        let info_query = format!("info:{}:scholar.google.com/", id);
        tracing::debug!(source = "google", %url, id, "fetching citation options");

        let request = self
            .client
            .get(&url)
            .query(&[("q", info_query.as_str()), ("output", "cite")]);
        let cite_page = send_text(request, "fetch Google Scholar citation options").await?;

        let href = parse_bibtex_link(&cite_page)?;
        let bibtex_url = resolve_link(&url, &href)?;
        tracing::debug!(source = "google", url = %bibtex_url, "retrieving reference");

        let body = send_text(
            self.client.get(bibtex_url.as_str()),
            "retrieve Google Scholar reference",
        )
        .await?;

        Ok(body.trim().to_string())
    }
}

/// Extract every organic result from a Scholar result page.
///
/// Results without a `data-cid` attribute cannot be retrieved later and fail
/// the parse.
pub(crate) fn parse_search_results(html: &str) -> Result<Vec<ArticleSummary>, SourceError> {
    let document = Html::parse_document(html);
    let result = selector(".gs_r.gs_or")?;
    let title_link = selector(".gs_rt a")?;
    let title_block = selector(".gs_rt")?;
    let byline = selector(".gs_a")?;

    document
        .select(&result)
        .map(|item| {
            let id = item
                .value()
                .attr("data-cid")
                .ok_or_else(|| SourceError::Parse("Scholar result without data-cid".to_string()))?;

            // [CITATION] entries have no link, only a span
            let title = item
                .select(&title_link)
                .next()
                .or_else(|| item.select(&title_block).next())
                .map(|t| element_text(&t))
                .unwrap_or_default();

            let authors = item
                .select(&byline)
                .next()
                .map(|b| element_text(&b))
                .unwrap_or_default();

            Ok(ArticleSummary::new(id, title, authors))
        })
        .collect()
}

/// Find the href of the "BibTeX" export link on an `output=cite` page.
pub(crate) fn parse_bibtex_link(html: &str) -> Result<String, SourceError> {
    let document = Html::parse_document(html);
    let anchor = selector("a")?;

    document
        .select(&anchor)
        .find(|a| a.text().collect::<String>().contains("BibTeX"))
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .ok_or_else(|| SourceError::Parse("No BibTeX link on Scholar citation page".to_string()))
}

/// Scholar usually returns absolute export links; tolerate relative ones.
fn resolve_link(page_url: &str, href: &str) -> Result<Url, SourceError> {
    let base = Url::parse(page_url)
        .map_err(|e| SourceError::Parse(format!("Invalid Scholar URL '{}': {}", page_url, e)))?;
    base.join(href)
        .map_err(|e| SourceError::Parse(format!("Invalid BibTeX link '{}': {}", href, e)))
}
