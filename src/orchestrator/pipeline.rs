//! The pipeline driver: one query in, one ordered result list out.
//!
//! # Stages
//!
//! 1. Validate the query and resolve the cost profile
//! 2. Consult the injected cache (provider, cost mode, normalised query)
//! 3. Build the query context
//! 4. Stage A: priority-seeded retrieval under the call budget
//! 5. Stage B: one unrestricted fallback query, only on under-delivery
//! 6. Score, sort, and assemble with per-domain caps
//! 7. Attach metadata and store the outcome in the cache
//!
//! Provider calls are strictly sequential; everything between them is
//! pure synchronous computation.

use crate::budget::ProviderBudget;
use crate::cache::{CacheKey, ResultCache};
use crate::config::{cost_profile_for, validate_query, PipelineOptions};
use crate::context::QueryContext;
use crate::error::Result;
use crate::provider::SearchProvider;
use crate::types::{PipelineMetadata, PipelineResult};

use super::buffer::CandidateBuffer;
use super::{assemble, fallback, scoring, stage_a};

/// Run the full search pipeline for one query.
///
/// # Errors
///
/// Returns [`crate::SearchError::Config`] for an empty query and
/// propagates fatal provider errors. Budget exhaustion and malformed
/// provider rows are not errors.
pub async fn run_search_pipeline(
    query: &str,
    provider: &dyn SearchProvider,
    cache: Option<&dyn ResultCache>,
    options: &PipelineOptions,
) -> Result<PipelineResult> {
    validate_query(query)?;
    let profile = cost_profile_for(options.cost_mode, options.max_provider_calls);

    let cache_key = CacheKey::new(provider.name(), options.cost_mode, query);
    if let Some(cache) = cache {
        if let Some(hit) = cache.get(&cache_key).await {
            tracing::debug!(mode = %options.cost_mode, "pipeline cache hit");
            return Ok(hit);
        }
    }

    let ctx = QueryContext::build(query);
    let mut budget = ProviderBudget::new(profile.max_provider_calls);
    let mut buffer = CandidateBuffer::new();

    stage_a::run_stage_a(query, &ctx, &profile, provider, &mut budget, &mut buffer).await?;

    let mut fallback_used = false;
    if buffer.priority_count() < profile.min_good_results {
        fallback_used = true;
        tracing::debug!(
            priority = buffer.priority_count(),
            needed = profile.min_good_results,
            "stage A under-delivered, running fallback"
        );
        fallback::run_fallback(query, &ctx, &profile, provider, &mut budget, &mut buffer).await?;
    }

    let mut candidates = buffer.into_results();
    scoring::score_all(&mut candidates, &ctx);
    scoring::sort_ranked(&mut candidates);
    let results = assemble::assemble(candidates, profile.final_per_domain_cap, profile.max_results);

    let metadata = PipelineMetadata {
        fallback_used,
        priority_result_count: results.iter().filter(|r| r.is_priority).count(),
        total_result_count: results.len(),
        cost_mode: options.cost_mode,
        provider_request_count: budget.used(),
        provider_request_limit: budget.limit(),
        provider_budget_exhausted: budget.is_exhausted(),
    };
    tracing::debug!(
        total = metadata.total_result_count,
        priority = metadata.priority_result_count,
        requests = metadata.provider_request_count,
        fallback = metadata.fallback_used,
        "pipeline run complete"
    );

    let outcome = PipelineResult { results, metadata };
    if let Some(cache) = cache {
        cache.insert(cache_key, outcome.clone()).await;
    }
    Ok(outcome)
}
