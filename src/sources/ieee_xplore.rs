//! IEEE Xplore research source implementation.
//!
//! Uses the JSON endpoint behind the IEEE Xplore search page and the
//! citation download form. Both expect a session cookie; any well-formed
//! value is accepted, so a placeholder is sent unless one is configured.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::models::{ArticleSummary, CitationText, SourceKind};
use crate::sources::{Source, SourceError};
use crate::utils::{send, send_text, HttpClient};

/// Production base URL
pub const IEEE_BASE_URL: &str = "https://ieeexplore.ieee.org";

/// Placeholder session cookie accepted by the search and citation endpoints
pub const IEEE_DEFAULT_SESSION_COOKIE: &str = "JSESSIONID=bibtex-search";

/// IEEE Xplore research source
#[derive(Debug, Clone)]
pub struct IeeeXploreSource {
    client: HttpClient,
    base_url: String,
    session_cookie: String,
}

impl IeeeXploreSource {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, IEEE_BASE_URL)
    }

    /// Point the adapter at another host (mirrors, tests)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie: IEEE_DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    /// Replace the placeholder session cookie
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = cookie.into();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/rest/search", self.base_url)
    }

    fn citations_url(&self) -> String {
        format!("{}/xpl/downloadCitations", self.base_url)
    }
}

#[async_trait]
impl Source for IeeeXploreSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Ieee
    }

    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>, SourceError> {
        let url = self.search_url();
        tracing::debug!(source = "ieee", %url, query, "searching");

        let request = self
            .client
            .post(&url)
            .header(COOKIE, &self.session_cookie)
            .json(&IeeeSearchRequest {
                newsearch: true,
                query_text: query,
            });

        let response: IeeeSearchResponse = send(request, "search IEEE Xplore")
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse IEEE Xplore response: {}", e)))?;

        let articles = response.into_articles();
        tracing::debug!(source = "ieee", count = articles.len(), "parsed search results");
        Ok(articles)
    }

    async fn retrieve(&self, id: &str) -> Result<CitationText, SourceError> {
        let url = self.citations_url();
        tracing::debug!(source = "ieee", %url, id, "retrieving reference");

        let request = self
            .client
            .post(&url)
            .header(COOKIE, &self.session_cookie)
            .form(&[
                ("citations-format", "citation-only"),
                ("download-format", "download-bibtex"),
                ("recordIds", id),
            ]);
        let body = send_text(request, "retrieve IEEE Xplore reference").await?;

        Ok(clean_citation(&body))
    }
}

/// Strip markup and the blank-line padding IEEE puts around each field.
pub(crate) fn clean_citation(body: &str) -> CitationText {
    let text = Html::parse_fragment(body)
        .root_element()
        .text()
        .collect::<String>();

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IeeeSearchRequest<'a> {
    newsearch: bool,
    query_text: &'a str,
}

/// IEEE Xplore search response; `records` is absent when nothing matched
#[derive(Debug, Deserialize)]
struct IeeeSearchResponse {
    #[serde(default)]
    records: Option<Vec<IeeeRecord>>,
}

impl IeeeSearchResponse {
    fn into_articles(self) -> Vec<ArticleSummary> {
        self.records
            .unwrap_or_default()
            .into_iter()
            .map(IeeeRecord::into_article)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IeeeRecord {
    article_number: String,
    #[serde(default)]
    article_title: Option<String>,
    #[serde(default)]
    authors: Vec<IeeeAuthor>,
}

impl IeeeRecord {
    fn into_article(self) -> ArticleSummary {
        let authors = self
            .authors
            .into_iter()
            .filter_map(|a| a.preferred_name)
            .collect::<Vec<_>>()
            .join(", ");

        ArticleSummary::new(
            self.article_number,
            self.article_title.unwrap_or_default(),
            authors,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IeeeAuthor {
    #[serde(default)]
    preferred_name: Option<String>,
}
