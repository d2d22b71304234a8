//! Integration tests for the full search pipeline.
//!
//! These tests drive `run_search_pipeline` and `search_with_escalation`
//! against scripted providers (no network). Each scripted provider
//! answers by the first matching query fragment and records every call,
//! so tests can assert on both output and provider traffic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use atlas_search::{
    run_search_pipeline, search_with_escalation, CostMode, EscalationOptions, MemoryCache,
    PipelineOptions, ProviderRow, Result, SearchError, SearchProvider,
};

/// Scripted provider: answers by first matching query fragment and
/// records every query it receives.
#[derive(Default)]
struct ScriptedProvider {
    rules: Vec<(String, Vec<ProviderRow>)>,
    reject_compound: bool,
    fail_with_500_after: Option<u32>,
    calls: Mutex<Vec<String>>,
    call_count: AtomicU32,
}

impl ScriptedProvider {
    fn on(mut self, fragment: &str, rows: Vec<ProviderRow>) -> Self {
        self.rules.push((fragment.into(), rows));
        self
    }

    fn queries(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn dispatched(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search_web(&self, query: &str, _count: usize) -> Result<Vec<ProviderRow>> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().expect("lock").push(query.to_string());

        if let Some(threshold) = self.fail_with_500_after {
            if n > threshold {
                return Err(SearchError::Provider {
                    status: 500,
                    message: "scripted failure".into(),
                });
            }
        }
        if self.reject_compound && query.contains(" OR site:") {
            return Err(SearchError::Provider {
                status: 422,
                message: "query too complex".into(),
            });
        }
        for (fragment, rows) in &self.rules {
            if query.contains(fragment.as_str()) {
                return Ok(rows.clone());
            }
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn row(title: &str, url: &str, snippet: &str) -> ProviderRow {
    ProviderRow {
        title: title.into(),
        url: url.into(),
        snippet: snippet.into(),
    }
}

/// Priority rows across several distinct authority domains.
fn diverse_priority_rows(snippet: &str) -> Vec<ProviderRow> {
    vec![
        row("Income tables", "https://data.census.gov/table/S1901", snippet),
        row("Income topic page", "https://www.census.gov/topics/income", snippet),
        row("Earnings by county", "https://www.bls.gov/lau/county", snippet),
        row("Regional income", "https://www.bea.gov/data/income", snippet),
        row("County rankings", "https://www.countyhealthrankings.org/income", snippet),
        row("Rural income", "https://www.ers.usda.gov/topics/income", snippet),
    ]
}

// ── Determinism and dedup ─────────────────────────────────────────────

#[tokio::test]
async fn identical_inputs_produce_identical_output() {
    let make_provider = || {
        ScriptedProvider::default()
            .on("site:", diverse_priority_rows("median household income estimates"))
            .on(
                "median household income",
                vec![
                    row("Income explainer", "https://example.org/income", "income overview"),
                    row("Income data hub", "https://example.net/income", "income data"),
                ],
            )
    };
    let options = PipelineOptions::default();

    let first = run_search_pipeline(
        "median household income",
        &make_provider(),
        None,
        &options,
    )
    .await
    .expect("first run");
    let second = run_search_pipeline(
        "median household income",
        &make_provider(),
        None,
        &options,
    )
    .await
    .expect("second run");

    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn no_two_results_share_a_canonical_url() {
    // The same page arrives under several equivalent URLs.
    let provider = ScriptedProvider::default().on(
        "site:",
        vec![
            row("Income tables", "https://data.census.gov/table/S1901", "income"),
            row("Income tables", "https://data.census.gov/table/S1901/", "income"),
            row(
                "Income tables",
                "https://data.census.gov/table/S1901#content",
                "income",
            ),
            row(
                "Income tables",
                "https://data.census.gov/table/S1901?utm_source=feed",
                "income",
            ),
        ],
    );

    let outcome = run_search_pipeline(
        "median household income",
        &provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    assert_eq!(outcome.results.len(), 1);
}

// ── Budget ────────────────────────────────────────────────────────────

#[tokio::test]
async fn provider_calls_never_exceed_override_ceiling() {
    let provider = ScriptedProvider::default();
    let options = PipelineOptions {
        cost_mode: CostMode::Economy,
        max_provider_calls: Some(2),
    };

    let outcome = run_search_pipeline("median household income", &provider, None, &options)
        .await
        .expect("pipeline");

    assert!(provider.dispatched() <= 2);
    assert_eq!(outcome.metadata.provider_request_limit, 2);
    assert!(outcome.metadata.provider_request_count <= 2);
}

#[tokio::test]
async fn exhausted_budget_is_soft_and_reported() {
    // Nothing comes back, so Stage B still wants a call — but the single
    // budget unit is already spent by then.
    let provider = ScriptedProvider::default();
    let options = PipelineOptions {
        cost_mode: CostMode::Economy,
        max_provider_calls: Some(1),
    };

    let outcome = run_search_pipeline("median household income", &provider, None, &options)
        .await
        .expect("pipeline");

    // The run completed without error and flagged the exhaustion.
    assert!(outcome.metadata.provider_budget_exhausted);
    assert_eq!(outcome.metadata.provider_request_count, 1);
    assert!(outcome.results.is_empty());
}

// ── Core-term gate ────────────────────────────────────────────────────

#[tokio::test]
async fn results_without_core_terms_never_surface() {
    let provider = ScriptedProvider::default()
        .on("site:", vec![])
        .on(
            "median household income",
            vec![
                row("Income by county", "https://example.org/income", "income"),
                row("Celebrity gossip", "https://example.com/gossip", "celebrity news"),
            ],
        );

    let outcome = run_search_pipeline(
        "median household income",
        &provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    assert!(outcome
        .results
        .iter()
        .all(|r| r.domain != "example.com"));
    assert!(outcome.results.iter().any(|r| r.domain == "example.org"));
}

// ── Domain diversity ──────────────────────────────────────────────────

#[tokio::test]
async fn final_per_domain_cap_holds_when_candidates_abound() {
    let mut fallback_rows: Vec<ProviderRow> = (0..6)
        .map(|n| {
            row(
                "Income commentary",
                &format!("https://bigsite.com/income/{n}"),
                "income commentary",
            )
        })
        .collect();
    fallback_rows.extend((0..9).map(|n| {
        row(
            "Income study",
            &format!("https://site{n}.org/income"),
            "income study",
        )
    }));

    let provider = ScriptedProvider::default()
        .on("site:", vec![])
        .on("median household income", fallback_rows);

    let outcome = run_search_pipeline(
        "median household income",
        &provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    // Plenty of single-domain alternatives, so the cap binds strictly.
    let bigsite_count = outcome
        .results
        .iter()
        .filter(|r| r.domain == "bigsite.com")
        .count();
    assert!(bigsite_count <= 2, "bigsite.com appeared {bigsite_count} times");
    assert!(outcome.results.len() <= 10);
}

// ── Spec scenarios ────────────────────────────────────────────────────

#[tokio::test]
async fn drought_tennessee_ranks_monitor_at_the_top() {
    let provider = ScriptedProvider::default()
        .on(
            "site:droughtmonitor.unl.edu",
            vec![row(
                "U.S. Drought Monitor: Tennessee",
                "https://droughtmonitor.unl.edu/CurrentMap/StateDroughtMonitor.aspx?TN",
                "weekly drought conditions for tennessee counties",
            )],
        )
        .on(
            "site:",
            vec![row(
                "Drought and agriculture",
                "https://www.ers.usda.gov/topics/drought",
                "drought impact on tennessee farms",
            )],
        )
        .on(
            "Drought monitor Tennessee counties",
            vec![row(
                "Drought news roundup",
                "https://example.com/news/drought-tennessee",
                "drought news for tennessee",
            )],
        );

    let outcome = run_search_pipeline(
        "Drought monitor Tennessee counties",
        &provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    let top = &outcome.results[0];
    assert_eq!(top.domain, "droughtmonitor.unl.edu");
    // Rule bonus (460) + priority bonus (1000) + at least one location match (70).
    assert!(top.score >= 1530, "top score was {}", top.score);
}

#[tokio::test]
async fn median_income_boosts_census_index_assets() {
    let provider = ScriptedProvider::default()
        .on(
            "site:data.census.gov",
            vec![row(
                "S1901: Income in the Past 12 Months",
                "https://data.census.gov/table/ACSST1Y2023.S1901",
                "median household income table, csv download, tennessee counties",
            )],
        )
        .on(
            "site:",
            vec![row(
                "Income and poverty",
                "https://www.census.gov/topics/income-poverty",
                "household income statistics for tennessee",
            )],
        );

    let outcome = run_search_pipeline(
        "Median household income by county Tennessee",
        &provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    let index_result = outcome
        .results
        .iter()
        .find(|r| r.domain == "data.census.gov")
        .expect("census index result present");
    let topic_result = outcome
        .results
        .iter()
        .find(|r| r.domain == "www.census.gov")
        .expect("census.gov result present");

    // The index result carries the authority-index and asset-hint bonuses.
    assert!(index_result.score > topic_result.score);
    assert_eq!(outcome.results[0].domain, "data.census.gov");
    assert!(index_result.score >= 1000 + 160 + 90);
}

#[tokio::test]
async fn rejected_sweep_batches_fall_back_per_domain_only_on_standard() {
    // Economy: flag off — rejected batches yield nothing, no error.
    let economy_provider = ScriptedProvider {
        reject_compound: true,
        ..Default::default()
    };
    let outcome = run_search_pipeline(
        "housing vacancy",
        &economy_provider,
        None,
        &PipelineOptions::default(),
    )
    .await
    .expect("economy run");
    assert!(economy_provider
        .queries()
        .iter()
        .any(|q| q.contains(" OR site:")));
    let economy_single_domain = economy_provider
        .queries()
        .iter()
        .filter(|q| q.contains("site:") && !q.contains(" OR "))
        .count();
    // Only the census seed runs a single-site query under economy.
    assert!(economy_single_domain <= 1);
    assert!(outcome.results.is_empty());

    // Standard: flag on — each rejected batch is retried per domain.
    let standard_provider = ScriptedProvider {
        reject_compound: true,
        ..Default::default()
    };
    let options = PipelineOptions {
        cost_mode: CostMode::Standard,
        max_provider_calls: None,
    };
    run_search_pipeline("housing vacancy", &standard_provider, None, &options)
        .await
        .expect("standard run");
    let standard_single_domain = standard_provider
        .queries()
        .iter()
        .filter(|q| q.contains("site:") && !q.contains(" OR "))
        .count();
    assert!(standard_single_domain > economy_single_domain);
}

// ── Escalation ────────────────────────────────────────────────────────

#[tokio::test]
async fn weak_economy_run_escalates_to_standard() {
    // One thin result everywhere: below every threshold.
    let provider = ScriptedProvider::default().on(
        "poverty",
        vec![row(
            "Poverty study",
            "https://example.org/poverty",
            "poverty study",
        )],
    );

    let outcome = search_with_escalation(
        "poverty data",
        &provider,
        None,
        &EscalationOptions::default(),
    )
    .await
    .expect("escalation");

    assert!(outcome.escalated);
    assert!(outcome.escalation_failure.is_none());
    // Both runs' provider traffic is summed in the winning metadata.
    assert_eq!(
        outcome.result.metadata.provider_request_count,
        provider.dispatched()
    );
}

#[tokio::test]
async fn strong_economy_run_never_escalates() {
    let provider = ScriptedProvider::default()
        .on("site:", diverse_priority_rows("median household income estimates"));

    let outcome = search_with_escalation(
        "median household income",
        &provider,
        None,
        &EscalationOptions::default(),
    )
    .await
    .expect("escalation");

    assert!(!outcome.escalated);
    assert!(outcome.escalation_failure.is_none());
    // Economy profile ceiling bounds all traffic — no second run happened.
    assert!(provider.dispatched() <= 6);
    assert_eq!(outcome.result.metadata.cost_mode, CostMode::Economy);
}

#[tokio::test]
async fn standard_mode_request_never_escalates() {
    let provider = ScriptedProvider::default();
    let options = EscalationOptions {
        cost_mode: CostMode::Standard,
        ..Default::default()
    };

    let outcome = search_with_escalation("poverty data", &provider, None, &options)
        .await
        .expect("escalation");

    assert!(!outcome.escalated);
    assert_eq!(outcome.result.metadata.cost_mode, CostMode::Standard);
}

#[tokio::test]
async fn failed_escalation_keeps_economy_result() {
    // Economy run (4 calls) succeeds; the standard rerun's first call
    // fails with a server error, which must be swallowed.
    let provider = ScriptedProvider {
        fail_with_500_after: Some(4),
        ..ScriptedProvider::default().on(
            "poverty",
            vec![row(
                "Poverty study",
                "https://example.org/poverty",
                "poverty study",
            )],
        )
    };

    let outcome = search_with_escalation(
        "poverty data",
        &provider,
        None,
        &EscalationOptions::default(),
    )
    .await
    .expect("escalation must not fail the request");

    assert!(outcome.escalated);
    let reason = outcome.escalation_failure.expect("failure recorded");
    assert!(reason.contains("500"));
    assert_eq!(outcome.result.metadata.cost_mode, CostMode::Economy);
    assert!(outcome
        .result
        .results
        .iter()
        .any(|r| r.domain == "example.org"));
}

// ── Cache ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn cached_run_issues_no_provider_calls() {
    let provider = ScriptedProvider::default()
        .on("site:", diverse_priority_rows("median household income estimates"));
    let cache = MemoryCache::default();
    let options = PipelineOptions::default();

    let first = run_search_pipeline("median household income", &provider, Some(&cache), &options)
        .await
        .expect("first run");
    let calls_after_first = provider.dispatched();
    assert!(calls_after_first > 0);

    let second = run_search_pipeline("median household income", &provider, Some(&cache), &options)
        .await
        .expect("second run");

    assert_eq!(provider.dispatched(), calls_after_first);
    assert_eq!(
        serde_json::to_string(&first).expect("json"),
        serde_json::to_string(&second).expect("json")
    );
}
