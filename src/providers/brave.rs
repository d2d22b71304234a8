//! Brave Search API provider — independent index, good coverage of
//! government sites.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::SearchProvider;
use crate::types::ProviderRow;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

/// Brave Search REST client.
pub struct BraveProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: BraveWebSection,
}

#[derive(Deserialize, Default)]
struct BraveWebSection {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveProvider {
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
impl SearchProvider for BraveProvider {
    async fn search_web(&self, query: &str, count: usize) -> Result<Vec<ProviderRow>> {
        tracing::trace!(query, count, "Brave search");

        let count_param = count.to_string();
        let response = self
            .client
            .get(format!("{}/res/v1/web/search", self.base_url))
            .query(&[("q", query), ("count", count_param.as_str())])
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SearchError::Provider {
                status: 0,
                message: format!("Brave request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: format!("Brave returned {status}: {body}"),
            });
        }

        let parsed: BraveResponse = response.json().await.map_err(|e| SearchError::Provider {
            status: 0,
            message: format!("Brave response parse failed: {e}"),
        })?;

        Ok(parsed
            .web
            .results
            .into_iter()
            .map(|r| ProviderRow {
                title: r.title,
                url: r.url,
                snippet: r.description,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "brave"
    }
}
