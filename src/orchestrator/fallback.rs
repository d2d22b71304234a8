//! Stage B: the unrestricted fallback query.
//!
//! Runs only when Stage A under-delivers on priority results. Exactly
//! one query without any domain filter; every well-formed row is kept,
//! priority or not, deduplicated against the whole run, until the
//! candidate set reaches twice the profile's target result count.

use crate::budget::ProviderBudget;
use crate::config::CostProfile;
use crate::context::QueryContext;
use crate::error::Result;
use crate::provider::SearchProvider;

use super::buffer::CandidateBuffer;
use super::normalize::normalize_row;

/// Run the single unrestricted fallback query into the shared buffer.
///
/// # Errors
///
/// Propagates provider errors; there is no 422 special case here — the
/// fallback query carries no compound `site:` filter to reject.
pub async fn run_fallback(
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    let rows = budget
        .search_with_budget(provider, query, profile.fallback_result_count)
        .await?;

    let candidate_cap = profile.target_result_count * 2;
    let mut added = 0;
    for row in &rows {
        if buffer.len() >= candidate_cap {
            break;
        }
        let Some(result) = normalize_row(row, ctx) else {
            continue;
        };
        if buffer.push(result, usize::MAX, candidate_cap) {
            added += 1;
        }
    }
    tracing::debug!(rows = rows.len(), added, "fallback query absorbed");
    Ok(())
}
