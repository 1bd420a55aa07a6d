//! HTTP client utilities.

use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::sources::SourceError;

/// Browser-like agent; Scholar answers non-browser agents with a captcha page.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_options(DEFAULT_USER_AGENT, None)
    }

    /// Create a new HTTP client with a custom user agent and optional timeout.
    ///
    /// Without a timeout, reqwest's defaults apply.
    pub fn with_options(user_agent: &str, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Start a POST request
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }
}

/// Send a request and fail on transport errors or a non-2xx status.
///
/// `context` names the operation in error messages, e.g. "search ACM".
pub async fn send(request: RequestBuilder, context: &str) -> Result<Response, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to {}: {}", context, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Api(format!(
            "Failed to {}: upstream returned status {}",
            context, status
        )));
    }

    Ok(response)
}

/// Send a request and read the body as text.
pub async fn send_text(request: RequestBuilder, context: &str) -> Result<String, SourceError> {
    send(request, context)
        .await?
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read response to {}: {}", context, e)))
}
