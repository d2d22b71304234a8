//! Exa search provider — neural index, useful for long-tail research
//! queries. Titles can be absent; such rows are dropped later during
//! normalisation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::SearchProvider;
use crate::types::ProviderRow;

const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// Exa REST client.
pub struct ExaProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ExaRequest<'a> {
    query: &'a str,
    #[serde(rename = "numResults")]
    num_results: usize,
}

#[derive(Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Deserialize)]
struct ExaResult {
    title: Option<String>,
    #[serde(default)]
    url: String,
    text: Option<String>,
}

impl ExaProvider {
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
impl SearchProvider for ExaProvider {
    async fn search_web(&self, query: &str, count: usize) -> Result<Vec<ProviderRow>> {
        tracing::trace!(query, count, "Exa search");

        let request = ExaRequest {
            query,
            num_results: count,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Provider {
                status: 0,
                message: format!("Exa request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: format!("Exa returned {status}: {body}"),
            });
        }

        let parsed: ExaResponse = response.json().await.map_err(|e| SearchError::Provider {
            status: 0,
            message: format!("Exa response parse failed: {e}"),
        })?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| ProviderRow {
                title: r.title.unwrap_or_default(),
                url: r.url,
                snippet: r.text.unwrap_or_default(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "exa"
    }
}
