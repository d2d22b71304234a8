//! Raw row normalisation and the core-term relevance gate.
//!
//! A provider row becomes a [`RankedResult`] only when it is well formed
//! (non-empty title, http/https URL, extractable host) and, when the
//! query has core terms, mentions at least one of them. The gate is a
//! hard filter applied before scoring, not a scoring penalty.

use url::Url;

use crate::context::{contains_term, QueryContext};
use crate::domains::is_priority_domain;
use crate::types::{ProviderRow, RankedResult};

use super::canonical::canonical_url_key;

/// Normalise one provider row against the query context.
///
/// Returns `None` for malformed rows and for rows that fail the
/// core-term gate. Malformed rows are dropped silently — they are
/// provider noise, not errors.
pub fn normalize_row(row: &ProviderRow, ctx: &QueryContext) -> Option<RankedResult> {
    let title = row.title.trim();
    if title.is_empty() {
        return None;
    }

    let parsed = Url::parse(row.url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let domain = parsed.host_str()?.to_lowercase();

    if !passes_core_term_gate(title, &row.snippet, &row.url, ctx) {
        return None;
    }

    Some(RankedResult {
        title: title.to_string(),
        url: row.url.trim().to_string(),
        snippet: row.snippet.trim().to_string(),
        is_priority: is_priority_domain(&domain),
        url_key: canonical_url_key(row.url.trim()),
        domain,
        score: 0,
    })
}

/// The hard relevance gate: at least one core term must appear in the
/// title, snippet, or URL. An empty core-term set admits everything.
fn passes_core_term_gate(title: &str, snippet: &str, url: &str, ctx: &QueryContext) -> bool {
    if ctx.core_terms.is_empty() {
        return true;
    }
    let haystack = format!("{} {} {}", title, snippet, url).to_lowercase();
    ctx.core_terms.iter().any(|term| contains_term(&haystack, term))
}
