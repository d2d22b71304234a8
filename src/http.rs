//! Shared HTTP client construction for provider REST clients.

use std::time::Duration;

use crate::error::SearchError;

/// Default per-request timeout for provider calls, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

/// Build a [`reqwest::Client`] configured for search provider APIs.
///
/// Bounded timeout, limited redirects, and a product User-Agent. The
/// timeout doubles as the pipeline's only cancellation mechanism for a
/// stuck provider call — a timed-out request surfaces as a provider
/// error from the client.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("atlas-search/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
