//! Cross-stage candidate buffer.
//!
//! One buffer lives for one pipeline run. It owns the run-wide
//! deduplication set (canonical URL keys) and the cumulative per-domain
//! counts that the seeding stages cap against. Results enter in
//! retrieval order; scoring and sorting happen later over a snapshot.

use std::collections::{HashMap, HashSet};

use crate::types::RankedResult;

/// Bounded, deduplicating result accumulator.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    results: Vec<RankedResult>,
    seen_keys: HashSet<String>,
    domain_counts: HashMap<String, usize>,
}

impl CandidateBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to append a candidate.
    ///
    /// Rejected when the buffer holds `buffer_limit` entries, when the
    /// canonical URL key was already seen this run, or when the
    /// candidate's domain already has `per_domain_cap` entries. Returns
    /// whether the candidate was kept.
    pub fn push(
        &mut self,
        result: RankedResult,
        per_domain_cap: usize,
        buffer_limit: usize,
    ) -> bool {
        if self.results.len() >= buffer_limit {
            return false;
        }
        if self.seen_keys.contains(&result.url_key) {
            return false;
        }
        let count = self.domain_counts.entry(result.domain.clone()).or_insert(0);
        if *count >= per_domain_cap {
            return false;
        }
        *count += 1;
        self.seen_keys.insert(result.url_key.clone());
        self.results.push(result);
        true
    }

    /// Number of buffered candidates.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Buffered candidates from priority domains.
    pub fn priority_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_priority).count()
    }

    /// Distinct domains among priority candidates.
    pub fn distinct_priority_domains(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.is_priority)
            .map(|r| r.domain.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Consume the buffer, yielding candidates in retrieval order.
    pub fn into_results(self) -> Vec<RankedResult> {
        self.results
    }
}
