//! Tavily search provider — research-focused API with good snippets.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::SearchProvider;
use crate::types::ProviderRow;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily REST client.
pub struct TavilyProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilyProvider {
    /// Create a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: http::build_client(http::DEFAULT_TIMEOUT_SECONDS)?,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search_web(&self, query: &str, count: usize) -> Result<Vec<ProviderRow>> {
        tracing::trace!(query, count, "Tavily search");

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: count,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Provider {
                status: 0,
                message: format!("Tavily request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: format!("Tavily returned {status}: {body}"),
            });
        }

        let parsed: TavilyResponse = response.json().await.map_err(|e| SearchError::Provider {
            status: 0,
            message: format!("Tavily response parse failed: {e}"),
        })?;

        Ok(rows_from_response(parsed))
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}

fn rows_from_response(response: TavilyResponse) -> Vec<ProviderRow> {
    response
        .results
        .into_iter()
        .map(|r| ProviderRow {
            title: r.title,
            url: r.url,
            snippet: r.content,
        })
        .collect()
}
