//! Final result assembly: domain diversity with overflow backfill.
//!
//! Walks the score-sorted candidate list once, admitting up to the
//! per-domain cap into a primary bucket and spilling the excess into an
//! overflow bucket. When the primary bucket is short of the absolute
//! maximum, overflow entries backfill it in score order. Diversity is
//! guaranteed at the head of the list without discarding same-domain
//! results entirely when the list is short.

use std::collections::HashMap;

use crate::types::RankedResult;

/// Apply the per-domain cap and absolute maximum to sorted candidates.
///
/// `sorted` must already be in final score order; assembly preserves
/// relative order within both buckets.
pub fn assemble(
    sorted: Vec<RankedResult>,
    per_domain_cap: usize,
    max_results: usize,
) -> Vec<RankedResult> {
    let mut primary: Vec<RankedResult> = Vec::with_capacity(max_results);
    let mut overflow: Vec<RankedResult> = Vec::new();
    let mut per_domain: HashMap<String, usize> = HashMap::new();

    for result in sorted {
        if primary.len() >= max_results {
            return primary;
        }
        let count = per_domain.entry(result.domain.clone()).or_insert(0);
        if *count < per_domain_cap {
            *count += 1;
            primary.push(result);
        } else {
            overflow.push(result);
        }
    }

    for result in overflow {
        if primary.len() >= max_results {
            break;
        }
        primary.push(result);
    }

    primary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(domain: &str, score: i64, n: usize) -> RankedResult {
        let url = format!("https://{domain}/page{n}");
        RankedResult {
            title: format!("Result {n}"),
            url: url.clone(),
            snippet: String::new(),
            domain: domain.into(),
            is_priority: false,
            score,
            url_key: url,
        }
    }

    #[test]
    fn per_domain_cap_enforced_in_primary() {
        let sorted = vec![
            make_result("a.gov", 90, 0),
            make_result("a.gov", 80, 1),
            make_result("a.gov", 70, 2),
            make_result("b.gov", 60, 3),
            make_result("c.gov", 50, 4),
        ];
        let assembled = assemble(sorted, 2, 4);

        // Third a.gov spilled; b and c admitted ahead of it.
        assert_eq!(assembled.len(), 4);
        assert_eq!(assembled[0].domain, "a.gov");
        assert_eq!(assembled[1].domain, "a.gov");
        assert_eq!(assembled[2].domain, "b.gov");
        assert_eq!(assembled[3].domain, "c.gov");
    }

    #[test]
    fn overflow_backfills_short_lists() {
        let sorted = vec![
            make_result("a.gov", 90, 0),
            make_result("a.gov", 80, 1),
            make_result("a.gov", 70, 2),
            make_result("a.gov", 60, 3),
        ];
        let assembled = assemble(sorted, 2, 3);

        // Primary holds two a.gov entries; backfill restores a third
        // rather than returning a short list.
        assert_eq!(assembled.len(), 3);
        assert_eq!(assembled[2].score, 70);
    }

    #[test]
    fn backfill_preserves_score_order() {
        let sorted = vec![
            make_result("a.gov", 90, 0),
            make_result("a.gov", 80, 1),
            make_result("a.gov", 70, 2),
            make_result("a.gov", 60, 3),
            make_result("b.gov", 50, 4),
        ];
        let assembled = assemble(sorted, 1, 4);

        assert_eq!(assembled.len(), 4);
        assert_eq!(assembled[0].score, 90); // a.gov primary
        assert_eq!(assembled[1].score, 50); // b.gov primary
        assert_eq!(assembled[2].score, 80); // backfill, best overflow first
        assert_eq!(assembled[3].score, 70);
    }

    #[test]
    fn absolute_maximum_truncates() {
        let sorted: Vec<RankedResult> = (0..10)
            .map(|n| make_result(&format!("d{n}.gov"), 100 - n as i64, n))
            .collect();
        let assembled = assemble(sorted, 2, 5);
        assert_eq!(assembled.len(), 5);
        assert_eq!(assembled[0].score, 100);
        assert_eq!(assembled[4].score, 96);
    }

    #[test]
    fn early_return_once_primary_full() {
        let mut sorted = vec![
            make_result("a.gov", 90, 0),
            make_result("b.gov", 80, 1),
        ];
        sorted.extend((0..20).map(|n| make_result("c.gov", 10, n + 2)));
        let assembled = assemble(sorted, 3, 2);
        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].domain, "a.gov");
        assert_eq!(assembled[1].domain, "b.gov");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(assemble(Vec::new(), 2, 10).is_empty());
    }

    #[test]
    fn short_diverse_list_passes_through() {
        let sorted = vec![
            make_result("a.gov", 90, 0),
            make_result("b.gov", 80, 1),
        ];
        let assembled = assemble(sorted, 2, 10);
        assert_eq!(assembled.len(), 2);
    }
}
