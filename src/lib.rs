//! # atlas-search
//!
//! Authority-biased web search ranking for civic data research.
//!
//! Takes a free-text research query, issues one or more budgeted calls
//! to an external search provider, and produces a deterministically
//! ordered, deduplicated, domain-diverse list of links biased toward a
//! curated allowlist of government, research, and non-profit domains.
//!
//! ## Design
//!
//! - Stage A seeds priority domains directly: topic-rule domains,
//!   the census index, then a batched `site:` sweep of the allowlist
//! - Stage B issues one unrestricted fallback query when Stage A
//!   under-delivers
//! - Deterministic integer scoring: authority, content-type, term,
//!   location, and topic signals with a fully specified tie-break
//! - A per-run call budget with soft reservation between stages
//! - Adaptive escalation from the `economy` to the `standard` cost
//!   profile when a cheap run looks weak
//!
//! The provider and the result cache are injected capabilities
//! ([`SearchProvider`], [`ResultCache`]); concrete REST clients live in
//! [`providers`]. The pipeline itself holds no shared mutable state —
//! concurrent requests are fully isolated.
//!
//! ## Security
//!
//! - Queries are logged at trace level only
//! - No network listeners — this is a library, not a server
//! - All runtime knobs arrive as explicit parameters, never from the
//!   process environment

pub mod budget;
pub mod cache;
pub mod config;
pub mod context;
pub mod domains;
pub mod error;
pub mod escalation;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod topics;
pub mod types;

pub use cache::{CacheKey, MemoryCache, ResultCache};
pub use config::{cost_profile_for, resolve_cost_mode, CostProfile, PipelineOptions};
pub use error::{Result, SearchError};
pub use escalation::{search_with_escalation, EscalationOptions, EscalationOutcome};
pub use provider::SearchProvider;
pub use types::{CostMode, PipelineMetadata, PipelineResult, ProviderRow, RankedResult};

/// Run the search pipeline once at a fixed cost mode.
///
/// This is the sole entry point a caller needs: it validates the query,
/// consults the cache, runs the staged retrieval under the call budget,
/// scores, and assembles the final list.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an empty query and propagates
/// fatal provider errors. Budget exhaustion is surfaced in metadata,
/// not as an error.
///
/// # Examples
///
/// ```no_run
/// # async fn example(provider: &dyn atlas_search::SearchProvider) -> atlas_search::Result<()> {
/// let options = atlas_search::PipelineOptions::default();
/// let outcome = atlas_search::run_search_pipeline(
///     "median household income by county tennessee",
///     provider,
///     None,
///     &options,
/// )
/// .await?;
/// for result in &outcome.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_search_pipeline(
    query: &str,
    provider: &dyn SearchProvider,
    cache: Option<&dyn ResultCache>,
    options: &PipelineOptions,
) -> Result<PipelineResult> {
    orchestrator::pipeline::run_search_pipeline(query, provider, cache, options).await
}
