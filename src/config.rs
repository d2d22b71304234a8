//! Cost profiles and pipeline options.
//!
//! A [`CostProfile`] is the bundle of numeric limits governing every
//! pipeline stage. Two named profiles exist: `economy` (cheap, small
//! caps) and `standard` (larger caps). Mode resolution is forgiving —
//! unrecognised input falls back to `economy`. Profile lookup is a pure
//! function of its inputs and safe to call repeatedly within a request.

use crate::error::{Result, SearchError};
use crate::types::CostMode;

/// Numeric limits for one pipeline run.
///
/// All knobs are fixed per profile except the provider call ceiling,
/// which a caller may override with a positive integer.
#[derive(Debug, Clone)]
pub struct CostProfile {
    /// Ceiling on provider calls for the whole run.
    pub max_provider_calls: u32,
    /// Result count requested per topic/census seed query.
    pub seed_result_count: usize,
    /// Global cap on topic seeding calls across all active rules.
    pub max_topic_seed_calls: u32,
    /// How many of a rule's domains receive seed queries.
    pub max_topic_seed_domains_per_rule: usize,
    /// Cap on census-index seed queries.
    pub max_census_seed_calls: u32,
    /// Maximum number of batches in the priority-domain sweep.
    pub stage_a_batch_limit: usize,
    /// Domains per sweep batch.
    pub stage_a_batch_size: usize,
    /// Result count requested per sweep batch query.
    pub stage_a_batch_result_count: usize,
    /// Result count per domain when a rejected batch is retried
    /// domain-by-domain.
    pub stage_a_domain_fallback_result_count: usize,
    /// Whether a batch rejected as too complex is retried per domain.
    pub allow_domain_fallback_on_rejection: bool,
    /// Per-domain cap while buffering seed-stage results.
    pub seed_per_domain_cap: usize,
    /// Per-domain cap while buffering sweep results.
    pub sweep_per_domain_cap: usize,
    /// Upper bound on buffered Stage A results.
    pub stage_a_buffer_limit: usize,
    /// Priority-result count at which Stage A stops seeding early.
    pub max_priority_results: usize,
    /// Distinct priority domains required for the Stage A early exit.
    pub min_stage_a_diverse_domains: usize,
    /// Priority-result count below which Stage B runs.
    pub min_good_results: usize,
    /// Result count requested by the unrestricted Stage B query.
    pub fallback_result_count: usize,
    /// Soft target for candidate volume; Stage B stops appending at
    /// twice this value.
    pub target_result_count: usize,
    /// Absolute maximum results returned by the assembler.
    pub max_results: usize,
    /// Per-domain cap enforced by the final assembler.
    pub final_per_domain_cap: usize,
}

const ECONOMY_PROFILE: CostProfile = CostProfile {
    max_provider_calls: 6,
    seed_result_count: 5,
    max_topic_seed_calls: 3,
    max_topic_seed_domains_per_rule: 2,
    max_census_seed_calls: 1,
    stage_a_batch_limit: 2,
    stage_a_batch_size: 8,
    stage_a_batch_result_count: 10,
    stage_a_domain_fallback_result_count: 4,
    allow_domain_fallback_on_rejection: false,
    seed_per_domain_cap: 2,
    sweep_per_domain_cap: 2,
    stage_a_buffer_limit: 24,
    max_priority_results: 8,
    min_stage_a_diverse_domains: 4,
    min_good_results: 5,
    fallback_result_count: 10,
    target_result_count: 8,
    max_results: 10,
    final_per_domain_cap: 2,
};

const STANDARD_PROFILE: CostProfile = CostProfile {
    max_provider_calls: 14,
    seed_result_count: 8,
    max_topic_seed_calls: 6,
    max_topic_seed_domains_per_rule: 3,
    max_census_seed_calls: 2,
    stage_a_batch_limit: 4,
    stage_a_batch_size: 8,
    stage_a_batch_result_count: 16,
    stage_a_domain_fallback_result_count: 6,
    allow_domain_fallback_on_rejection: true,
    seed_per_domain_cap: 2,
    sweep_per_domain_cap: 3,
    stage_a_buffer_limit: 48,
    max_priority_results: 12,
    min_stage_a_diverse_domains: 6,
    min_good_results: 8,
    fallback_result_count: 20,
    target_result_count: 12,
    max_results: 15,
    final_per_domain_cap: 3,
};

/// Resolve a candidate mode name to a [`CostMode`].
///
/// Lowercases and trims the input; anything that is not a known profile
/// name falls back to [`CostMode::Economy`].
pub fn resolve_cost_mode(candidate: &str) -> CostMode {
    match candidate.trim().to_lowercase().as_str() {
        "standard" => CostMode::Standard,
        "economy" => CostMode::Economy,
        _ => CostMode::Economy,
    }
}

/// Look up the profile for `mode`, applying an optional call-ceiling
/// override.
///
/// A positive `max_provider_calls` replaces the profile's ceiling;
/// zero is ignored and the profile default is used.
pub fn cost_profile_for(mode: CostMode, max_provider_calls: Option<u32>) -> CostProfile {
    let mut profile = match mode {
        CostMode::Economy => ECONOMY_PROFILE.clone(),
        CostMode::Standard => STANDARD_PROFILE.clone(),
    };
    if let Some(ceiling) = max_provider_calls {
        if ceiling > 0 {
            profile.max_provider_calls = ceiling;
        }
    }
    profile
}

/// Caller-supplied options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Which cost profile governs the run.
    pub cost_mode: CostMode,
    /// Optional override of the profile's provider call ceiling.
    /// Zero is ignored.
    pub max_provider_calls: Option<u32>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            cost_mode: CostMode::Economy,
            max_provider_calls: None,
        }
    }
}

/// Validate a query string at the pipeline entry point.
pub(crate) fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SearchError::Config("query must not be empty".into()));
    }
    Ok(())
}
