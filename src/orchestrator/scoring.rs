//! Deterministic result scoring.
//!
//! A result's score is a sum of independent additive and subtractive
//! signals; higher is better. Scores are never normalised — they are
//! relative within one run only. The constants were tuned against a
//! regression suite; treat each as load-bearing and change none of them
//! without rerunning that suite.

use std::cmp::Ordering;

use url::Url;

use crate::context::{contains_term, QueryContext};
use crate::domains::CENSUS_INDEX_DOMAIN;
use crate::types::RankedResult;

// ── Authority signals ────────────────────────────────────────────────

/// Hostname is on the curated authority allowlist.
pub const PRIORITY_DOMAIN_BONUS: i64 = 1000;
/// Hostname is the flagship statistical authority index.
pub const CENSUS_INDEX_BONUS: i64 = 160;
/// Result is the authority index but the query is topical and does not
/// literally mention "census".
pub const CENSUS_OFF_TOPIC_PENALTY: i64 = -190;

// ── Content-type signals ─────────────────────────────────────────────

/// Title/snippet/URL mentions a downloadable-data hint.
pub const DATA_ASSET_HINT_BONUS: i64 = 90;
/// Title/snippet/URL mentions a map/GIS hint.
pub const GIS_HINT_BONUS: i64 = 45;
/// URL path ends in a data file extension.
pub const DATA_FILE_EXTENSION_BONUS: i64 = 140;
/// Title/snippet/URL mentions non-data site chrome.
pub const NON_DATA_HINT_PENALTY: i64 = -45;

// ── Term-match signals ───────────────────────────────────────────────

/// Per core term found in the title.
pub const CORE_TERM_TITLE_BONUS: i64 = 24;
/// Per core term found in the snippet.
pub const CORE_TERM_SNIPPET_BONUS: i64 = 12;
/// Per core term found in the URL.
pub const CORE_TERM_URL_BONUS: i64 = 8;
/// Per core term matched anywhere at least once.
pub const CORE_TERM_UNIQUE_MATCH_BONUS: i64 = 18;
/// Per raw query term found in the title.
pub const QUERY_TERM_TITLE_BONUS: i64 = 8;
/// Per raw query term found in the snippet.
pub const QUERY_TERM_SNIPPET_BONUS: i64 = 4;
/// Per raw query term found in the URL.
pub const QUERY_TERM_URL_BONUS: i64 = 3;

// ── Location signals ─────────────────────────────────────────────────

/// Per location signal the result matches, when the query has any.
pub const LOCATION_MATCH_BONUS: i64 = 70;
/// The query has location signals and the result matches none.
pub const LOCATION_MISS_PENALTY: i64 = -90;

const DATA_ASSET_HINTS: &[&str] = &[
    "table", "tables", "dataset", "datasets", "data", "csv", "xlsx", "excel", "download",
    "api", "shapefile", "geojson", "map",
];

const GIS_HINTS: &[&str] = &["map", "maps", "gis", "arcgis", "atlas", "geospatial"];

const NON_DATA_HINTS: &[&str] = &[
    "news", "blog", "press", "careers", "jobs", "privacy", "login", "signup", "about",
    "contact", "terms", "events", "newsletter", "webinar",
];

const DATA_FILE_EXTENSIONS: &[&str] = &[
    ".csv", ".tsv", ".xlsx", ".xls", ".geojson", ".shp", ".kml", ".zip",
];

/// Compute the score for one normalised result.
pub fn score_result(result: &RankedResult, ctx: &QueryContext) -> i64 {
    let title = result.title.to_lowercase();
    let snippet = result.snippet.to_lowercase();
    let url = result.url.to_lowercase();
    let haystack = format!("{title} {snippet} {url}");

    let mut score = 0i64;

    // Authority signals.
    if result.is_priority {
        score += PRIORITY_DOMAIN_BONUS;
    }
    if result.domain == CENSUS_INDEX_DOMAIN {
        score += CENSUS_INDEX_BONUS;
        if !ctx.active_topic_rules.is_empty() && !ctx.has_term("census") {
            score += CENSUS_OFF_TOPIC_PENALTY;
        }
    }

    // Content-type signals.
    if DATA_ASSET_HINTS.iter().any(|h| contains_term(&haystack, h)) {
        score += DATA_ASSET_HINT_BONUS;
    }
    if GIS_HINTS.iter().any(|h| contains_term(&haystack, h)) {
        score += GIS_HINT_BONUS;
    }
    if has_data_file_extension(&result.url) {
        score += DATA_FILE_EXTENSION_BONUS;
    }
    if NON_DATA_HINTS.iter().any(|h| contains_term(&haystack, h)) {
        score += NON_DATA_HINT_PENALTY;
    }

    // Core-term matches.
    for term in &ctx.core_terms {
        let mut matched = false;
        if contains_term(&title, term) {
            score += CORE_TERM_TITLE_BONUS;
            matched = true;
        }
        if contains_term(&snippet, term) {
            score += CORE_TERM_SNIPPET_BONUS;
            matched = true;
        }
        if contains_term(&url, term) {
            score += CORE_TERM_URL_BONUS;
            matched = true;
        }
        if matched {
            score += CORE_TERM_UNIQUE_MATCH_BONUS;
        }
    }

    // Raw query-term matches.
    for term in &ctx.query_terms {
        if contains_term(&title, term) {
            score += QUERY_TERM_TITLE_BONUS;
        }
        if contains_term(&snippet, term) {
            score += QUERY_TERM_SNIPPET_BONUS;
        }
        if contains_term(&url, term) {
            score += QUERY_TERM_URL_BONUS;
        }
    }

    // Location signals.
    if !ctx.location_signals.is_empty() {
        let matches = ctx
            .location_signals
            .iter()
            .filter(|signal| signal.aliases.iter().any(|a| contains_term(&haystack, a)))
            .count() as i64;
        if matches == 0 {
            score += LOCATION_MISS_PENALTY;
        } else {
            score += LOCATION_MATCH_BONUS * matches;
        }
    }

    // Topic-rule bonuses, summed over all matching active rules.
    for rule in &ctx.active_topic_rules {
        if rule.domains.iter().any(|d| *d == result.domain) {
            score += rule.bonus;
        }
    }

    score
}

/// Fill the score field of every candidate.
pub fn score_all(results: &mut [RankedResult], ctx: &QueryContext) {
    for result in results.iter_mut() {
        result.score = score_result(result, ctx);
    }
}

/// Sort into the pipeline's deterministic output order: score
/// descending, then priority results first, then domain ascending, then
/// title ascending.
pub fn sort_ranked(results: &mut [RankedResult]) {
    results.sort_by(compare_ranked);
}

fn compare_ranked(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.is_priority.cmp(&a.is_priority))
        .then_with(|| a.domain.cmp(&b.domain))
        .then_with(|| a.title.cmp(&b.title))
}

fn has_data_file_extension(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = parsed.path().to_lowercase();
    DATA_FILE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
