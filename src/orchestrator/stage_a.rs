//! Stage A: priority-seeded retrieval.
//!
//! Three seeding steps run in strict order, each under the shared call
//! budget: topic seeding for active rules, census-index seeding for
//! general statistical queries, and a batched `site:` sweep over the
//! rest of the authority allowlist. Only priority-domain rows are kept.
//! The early-exit predicate is evaluated between steps; once satisfied,
//! remaining seeding is skipped.

use crate::budget::ProviderBudget;
use crate::config::CostProfile;
use crate::context::QueryContext;
use crate::domains::{sweep_domains, CENSUS_INDEX_DOMAIN};
use crate::error::Result;
use crate::provider::SearchProvider;
use crate::topics::TopicRule;
use crate::types::ProviderRow;

use super::buffer::CandidateBuffer;
use super::normalize::normalize_row;

/// Suffix nudging the census index toward downloadable assets.
const CENSUS_ASSET_SUFFIX: &str = "dataset table download csv xlsx";

/// Run all Stage A seeding against the shared buffer.
///
/// # Errors
///
/// Propagates provider errors, except the 422-class rejection of a
/// compound sweep query, which is handled in place (per-domain retry or
/// an empty batch, depending on the profile).
pub async fn run_stage_a(
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    seed_topics(query, ctx, profile, provider, budget, buffer).await?;
    if stage_a_satisfied(buffer, profile) {
        tracing::debug!(buffered = buffer.len(), "stage A satisfied after topic seeding");
        return Ok(());
    }

    seed_census_index(query, ctx, profile, provider, budget, buffer).await?;
    if stage_a_satisfied(buffer, profile) {
        tracing::debug!(buffered = buffer.len(), "stage A satisfied after census seeding");
        return Ok(());
    }

    sweep_priority_batches(query, ctx, profile, provider, budget, buffer).await?;
    Ok(())
}

/// Enough Stage A results to stop seeding early.
pub fn stage_a_satisfied(buffer: &CandidateBuffer, profile: &CostProfile) -> bool {
    buffer.priority_count() >= profile.max_priority_results
        && buffer.distinct_priority_domains() >= profile.min_stage_a_diverse_domains
}

/// Step 1: seed the domains of every active topic rule.
async fn seed_topics(
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    let mut calls = 0u32;
    'rules: for rule in &ctx.active_topic_rules {
        for domain in rule.domains.iter().take(profile.max_topic_seed_domains_per_rule) {
            for seed_query in topic_seed_queries(query, ctx, rule, domain) {
                if calls >= profile.max_topic_seed_calls || budget.remaining() <= 1 {
                    break 'rules;
                }
                let rows = budget
                    .search_with_budget(provider, &seed_query, profile.seed_result_count)
                    .await?;
                calls += 1;
                let added = absorb_priority_rows(
                    &rows,
                    ctx,
                    buffer,
                    profile.seed_per_domain_cap,
                    profile.stage_a_buffer_limit,
                );
                tracing::trace!(rule = rule.id, domain, added, "topic seed absorbed");
            }
        }
    }
    Ok(())
}

/// The 1–2 seed queries for one topic rule domain: a site-scoped form
/// of the raw query, plus a focused trigger+location form when the
/// query carries location signals.
fn topic_seed_queries(
    query: &str,
    ctx: &QueryContext,
    rule: &TopicRule,
    domain: &str,
) -> Vec<String> {
    let mut queries = vec![format!("{query} site:{domain}")];
    if !ctx.location_signals.is_empty() {
        let locations: Vec<&str> = ctx
            .location_signals
            .iter()
            .take(2)
            .map(|signal| signal.id)
            .collect();
        queries.push(format!(
            "{} {} site:{domain}",
            rule.trigger_terms.join(" "),
            locations.join(" ")
        ));
    }
    queries
}

/// Step 2: seed the flagship statistical authority index.
///
/// Gated twice: the query must contain census-seed vocabulary, and
/// topical queries are skipped unless they literally say "census".
async fn seed_census_index(
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    if !ctx.looks_like_census_query() {
        return Ok(());
    }
    if !ctx.active_topic_rules.is_empty() && !ctx.has_term("census") {
        return Ok(());
    }

    let queries = [
        format!("{query} {CENSUS_ASSET_SUFFIX} site:{CENSUS_INDEX_DOMAIN}"),
        format!("{query} site:{CENSUS_INDEX_DOMAIN}"),
    ];
    let mut calls = 0u32;
    for seed_query in queries {
        if calls >= profile.max_census_seed_calls || budget.remaining() == 0 {
            break;
        }
        let rows = budget
            .search_with_budget(provider, &seed_query, profile.seed_result_count)
            .await?;
        calls += 1;
        let added = absorb_priority_rows(
            &rows,
            ctx,
            buffer,
            profile.seed_per_domain_cap,
            profile.stage_a_buffer_limit,
        );
        tracing::trace!(added, "census index seed absorbed");
    }
    Ok(())
}

/// Step 3: batched `site:` OR sweep over the remaining authority list.
async fn sweep_priority_batches(
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    let domains = sweep_domains();
    for batch in domains
        .chunks(profile.stage_a_batch_size)
        .take(profile.stage_a_batch_limit)
    {
        if budget.remaining() <= 1 {
            break;
        }
        let site_filter = batch
            .iter()
            .map(|d| format!("site:{d}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let batch_query = format!("{query} ({site_filter})");

        match budget
            .search_with_budget(provider, &batch_query, profile.stage_a_batch_result_count)
            .await
        {
            Ok(rows) => {
                absorb_priority_rows(
                    &rows,
                    ctx,
                    buffer,
                    profile.sweep_per_domain_cap,
                    profile.stage_a_buffer_limit,
                );
            }
            Err(err) if err.is_query_rejected() => {
                tracing::debug!(error = %err, "compound sweep query rejected");
                if profile.allow_domain_fallback_on_rejection {
                    sweep_batch_per_domain(batch, query, ctx, profile, provider, budget, buffer)
                        .await?;
                }
                // Otherwise the batch yields nothing and the run continues.
            }
            Err(err) => return Err(err),
        }

        if stage_a_satisfied(buffer, profile) {
            break;
        }
    }
    Ok(())
}

/// Retry a rejected batch one domain at a time at a smaller count.
async fn sweep_batch_per_domain(
    batch: &[&str],
    query: &str,
    ctx: &QueryContext,
    profile: &CostProfile,
    provider: &dyn SearchProvider,
    budget: &mut ProviderBudget,
    buffer: &mut CandidateBuffer,
) -> Result<()> {
    for domain in batch {
        if budget.remaining() <= 1 {
            break;
        }
        let domain_query = format!("{query} site:{domain}");
        match budget
            .search_with_budget(
                provider,
                &domain_query,
                profile.stage_a_domain_fallback_result_count,
            )
            .await
        {
            Ok(rows) => {
                absorb_priority_rows(
                    &rows,
                    ctx,
                    buffer,
                    profile.sweep_per_domain_cap,
                    profile.stage_a_buffer_limit,
                );
            }
            Err(err) if err.is_query_rejected() => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Normalise rows, keep priority-domain entries only, and buffer them.
fn absorb_priority_rows(
    rows: &[ProviderRow],
    ctx: &QueryContext,
    buffer: &mut CandidateBuffer,
    per_domain_cap: usize,
    buffer_limit: usize,
) -> usize {
    let mut added = 0;
    for row in rows {
        let Some(result) = normalize_row(row, ctx) else {
            continue;
        };
        if !result.is_priority {
            continue;
        }
        if buffer.push(result, per_domain_cap, buffer_limit) {
            added += 1;
        }
    }
    added
}
