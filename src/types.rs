//! Core types: provider rows, ranked results, and pipeline output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single raw row returned from a web search provider.
///
/// No invariants are guaranteed — rows may be malformed (empty titles,
/// unparseable URLs) and are filtered during normalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRow {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
}

/// Named cost profile trading result quality for provider call volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMode {
    /// Cheap profile: small call caps, small result targets.
    Economy,
    /// Expensive profile: larger caps across every stage.
    Standard,
}

impl CostMode {
    /// Returns the lowercase mode name used in cache keys and metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalised, scored search result.
///
/// Created once from a [`ProviderRow`] during normalisation and never
/// mutated afterwards, apart from the single scoring pass that fills
/// `score`. `url_key` uniquely identifies a result within one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Non-empty result title.
    pub title: String,
    /// The original result URL.
    pub url: String,
    /// Snippet text (may be empty).
    pub snippet: String,
    /// Lowercase hostname of the URL. Non-empty.
    pub domain: String,
    /// Whether `domain` is on the curated authority allowlist.
    pub is_priority: bool,
    /// Relevance score. Integer sum of signal constants; relative within
    /// one run only.
    pub score: i64,
    /// Canonicalised URL used for deduplication.
    pub url_key: String,
}

/// Budget and quality metadata attached to every pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Whether the unrestricted Stage B fallback query ran.
    pub fallback_used: bool,
    /// Number of priority-domain results in the final list.
    pub priority_result_count: usize,
    /// Number of results in the final list.
    pub total_result_count: usize,
    /// The cost mode the run executed under.
    pub cost_mode: CostMode,
    /// Provider calls actually dispatched.
    pub provider_request_count: u32,
    /// The call ceiling the run was budgeted against.
    pub provider_request_limit: u32,
    /// Whether a call was skipped because the budget ran out.
    pub provider_budget_exhausted: bool,
}

/// Output of one pipeline run: ordered results plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Deduplicated, domain-diverse results in deterministic order.
    pub results: Vec<RankedResult>,
    /// Budget and quality metadata for the run.
    pub metadata: PipelineMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ranked(url: &str, domain: &str) -> RankedResult {
        RankedResult {
            title: "Example".into(),
            url: url.into(),
            snippet: "snippet".into(),
            domain: domain.into(),
            is_priority: false,
            score: 0,
            url_key: url.into(),
        }
    }

    #[test]
    fn cost_mode_display() {
        assert_eq!(CostMode::Economy.to_string(), "economy");
        assert_eq!(CostMode::Standard.to_string(), "standard");
    }

    #[test]
    fn cost_mode_serde_round_trip() {
        let json = serde_json::to_string(&CostMode::Standard).expect("serialize");
        assert_eq!(json, "\"standard\"");
        let decoded: CostMode = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, CostMode::Standard);
    }

    #[test]
    fn provider_row_serde_round_trip() {
        let row = ProviderRow {
            title: "Test".into(),
            url: "https://test.gov".into(),
            snippet: "snippet".into(),
        };
        let json = serde_json::to_string(&row).expect("serialize");
        let decoded: ProviderRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.title, "Test");
        assert_eq!(decoded.url, "https://test.gov");
    }

    #[test]
    fn pipeline_result_serde_round_trip() {
        let result = PipelineResult {
            results: vec![make_ranked("https://data.census.gov/table", "data.census.gov")],
            metadata: PipelineMetadata {
                fallback_used: false,
                priority_result_count: 1,
                total_result_count: 1,
                cost_mode: CostMode::Economy,
                provider_request_count: 2,
                provider_request_limit: 6,
                provider_budget_exhausted: false,
            },
        };
        let json = serde_json::to_string(&result).expect("serialize");
        let decoded: PipelineResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded.results.len(), 1);
        assert_eq!(decoded.metadata.cost_mode, CostMode::Economy);
        assert_eq!(decoded.metadata.provider_request_count, 2);
    }
}
