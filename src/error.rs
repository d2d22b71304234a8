//! Error types for the atlas-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Provider errors keep the HTTP-like status
//! code so call sites can distinguish the recoverable "query rejected as
//! too complex" case (status 422) from fatal failures.

/// Status code a provider returns when it rejects a query as too complex.
pub const STATUS_QUERY_REJECTED: u16 = 422;

/// Errors that can occur during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search provider returned a non-2xx response or failed outright.
    #[error("provider error (status {status}): {message}")]
    Provider {
        /// HTTP-like status code. Network-level failures use 0.
        status: u16,
        /// Human-readable failure description.
        message: String,
    },

    /// An HTTP client could not be constructed or a request could not be sent.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid pipeline configuration or query input.
    #[error("config error: {0}")]
    Config(String),

    /// The injected result cache failed.
    #[error("cache error: {0}")]
    Cache(String),
}

impl SearchError {
    /// Returns `true` for the 422-class "query too complex" rejection.
    ///
    /// The Stage A batched sweep treats this case specially: it either
    /// falls back to per-domain queries or swallows the batch to empty.
    /// Every other provider error aborts the run.
    pub fn is_query_rejected(&self) -> bool {
        matches!(
            self,
            Self::Provider { status, .. } if *status == STATUS_QUERY_REJECTED
        )
    }
}

/// Convenience type alias for atlas-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
