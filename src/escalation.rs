//! Adaptive escalation between the economy and standard profiles.
//!
//! The controller sits above the pipeline: it runs once at the
//! requested mode, judges the outcome against quality thresholds, and —
//! for economy runs only — reruns the whole pipeline at the standard
//! profile when the first pass looks weak. The better of the two runs
//! wins by quality score; ties favour the escalated run. A failure of
//! the rerun never fails the request.

use crate::cache::ResultCache;
use crate::config::PipelineOptions;
use crate::error::Result;
use crate::orchestrator::pipeline::run_search_pipeline;
use crate::provider::SearchProvider;
use crate::types::{CostMode, PipelineResult};

/// How many head-of-list results count toward domain diversity.
const DIVERSITY_WINDOW: usize = 8;

// Quality score weights.
const QUALITY_TOTAL_WEIGHT: i64 = 5;
const QUALITY_PRIORITY_WEIGHT: i64 = 7;
const QUALITY_DIVERSITY_WEIGHT: i64 = 4;
const QUALITY_METADATA_PRIORITY_WEIGHT: i64 = 2;
const QUALITY_FIRST_PRIORITY_BONUS: i64 = 3;

/// Options for an escalating search.
#[derive(Debug, Clone)]
pub struct EscalationOptions {
    /// Mode for the first pipeline run.
    pub cost_mode: CostMode,
    /// Optional call-ceiling override for the first run. The escalated
    /// run always uses the standard profile's own (larger) budget.
    pub max_provider_calls: Option<u32>,
    /// Minimum acceptable result count.
    pub min_results: usize,
    /// Minimum acceptable priority-result count.
    pub min_priority_results: usize,
    /// Minimum distinct domains in the head of the list.
    pub min_distinct_domains: usize,
}

impl Default for EscalationOptions {
    fn default() -> Self {
        Self {
            cost_mode: CostMode::Economy,
            max_provider_calls: None,
            min_results: 5,
            min_priority_results: 3,
            min_distinct_domains: 3,
        }
    }
}

/// Outcome of an escalating search.
#[derive(Debug, Clone)]
pub struct EscalationOutcome {
    /// The winning pipeline result.
    pub result: PipelineResult,
    /// Whether a standard-mode rerun was attempted.
    pub escalated: bool,
    /// Why the rerun's result was discarded, if it failed.
    pub escalation_failure: Option<String>,
}

/// Compute the quality score used to compare runs.
pub fn quality_score(result: &PipelineResult) -> i64 {
    let total = result.results.len() as i64;
    let priority = result.results.iter().filter(|r| r.is_priority).count() as i64;
    let distinct = distinct_domains_in_head(result) as i64;
    let first_priority = result
        .results
        .first()
        .is_some_and(|r| r.is_priority);

    QUALITY_TOTAL_WEIGHT * total
        + QUALITY_PRIORITY_WEIGHT * priority
        + QUALITY_DIVERSITY_WEIGHT * distinct
        + QUALITY_METADATA_PRIORITY_WEIGHT * result.metadata.priority_result_count as i64
        + if first_priority {
            QUALITY_FIRST_PRIORITY_BONUS
        } else {
            0
        }
}

fn distinct_domains_in_head(result: &PipelineResult) -> usize {
    result
        .results
        .iter()
        .take(DIVERSITY_WINDOW)
        .map(|r| r.domain.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len()
}

fn meets_thresholds(result: &PipelineResult, options: &EscalationOptions) -> bool {
    let priority = result.results.iter().filter(|r| r.is_priority).count();
    result.results.len() >= options.min_results
        && priority >= options.min_priority_results
        && distinct_domains_in_head(result) >= options.min_distinct_domains
}

/// Run the pipeline with automatic economy→standard escalation.
///
/// # Errors
///
/// Propagates errors of the first run only; a failed escalated run is
/// swallowed and recorded in [`EscalationOutcome::escalation_failure`].
pub async fn search_with_escalation(
    query: &str,
    provider: &dyn SearchProvider,
    cache: Option<&dyn ResultCache>,
    options: &EscalationOptions,
) -> Result<EscalationOutcome> {
    let first_options = PipelineOptions {
        cost_mode: options.cost_mode,
        max_provider_calls: options.max_provider_calls,
    };
    let first = run_search_pipeline(query, provider, cache, &first_options).await?;

    if options.cost_mode != CostMode::Economy || meets_thresholds(&first, options) {
        return Ok(EscalationOutcome {
            result: first,
            escalated: false,
            escalation_failure: None,
        });
    }

    tracing::debug!(
        total = first.results.len(),
        "economy run below thresholds, escalating to standard"
    );
    let standard_options = PipelineOptions {
        cost_mode: CostMode::Standard,
        max_provider_calls: None,
    };
    match run_search_pipeline(query, provider, cache, &standard_options).await {
        Ok(second) => {
            let first_quality = quality_score(&first);
            let second_quality = quality_score(&second);
            let combined_requests = first.metadata.provider_request_count
                + second.metadata.provider_request_count;
            let combined_limit =
                first.metadata.provider_request_limit + second.metadata.provider_request_limit;
            let either_exhausted = first.metadata.provider_budget_exhausted
                || second.metadata.provider_budget_exhausted;

            let mut chosen = if second_quality >= first_quality {
                second
            } else {
                first
            };
            chosen.metadata.provider_request_count = combined_requests;
            chosen.metadata.provider_request_limit = combined_limit;
            chosen.metadata.provider_budget_exhausted = either_exhausted;

            tracing::debug!(
                economy_quality = first_quality,
                standard_quality = second_quality,
                kept = %chosen.metadata.cost_mode,
                "escalation complete"
            );
            Ok(EscalationOutcome {
                result: chosen,
                escalated: true,
                escalation_failure: None,
            })
        }
        Err(err) => {
            tracing::warn!(error = %err, "escalated run failed, keeping economy result");
            Ok(EscalationOutcome {
                result: first,
                escalated: true,
                escalation_failure: Some(err.to_string()),
            })
        }
    }
}
