//! Capability trait for pluggable web-search providers.
//!
//! The pipeline consumes exactly one provider operation: a keyword web
//! search returning raw rows. Concrete REST clients live in
//! [`crate::providers`]; tests inject scripted implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ProviderRow;

/// A web-search provider backend.
///
/// Implementations must map non-2xx responses to
/// [`crate::SearchError::Provider`] with the real status code — the
/// orchestrator keys its 422 handling off that code. All implementations
/// must be `Send + Sync`; the pipeline holds the provider behind a
/// shared reference across await points.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a keyword web search.
    ///
    /// `count` is the number of rows requested; providers may return
    /// fewer. Rows are raw and unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Provider`] on provider failure,
    /// carrying the HTTP status code (0 for network-level failures).
    async fn search_web(&self, query: &str, count: usize) -> Result<Vec<ProviderRow>>;

    /// Stable provider name, used in cache keys and logs.
    fn name(&self) -> &'static str;
}
