//! Provider call budget, scoped to one pipeline run.
//!
//! [`ProviderBudget::search_with_budget`] is the single choke point for
//! all provider calls: once the ceiling is reached it marks the budget
//! exhausted and returns empty rows instead of calling out. Exhaustion
//! is a soft state surfaced in run metadata, never an error.
//!
//! Orchestration loops additionally treat `remaining() <= 1` as "stop
//! seeding" to preserve one call for a higher-value stage. That is a
//! soft reservation heuristic — calls are strictly sequential within a
//! run, so slight overrun cannot occur from races.

use crate::error::Result;
use crate::provider::SearchProvider;
use crate::types::ProviderRow;

/// Mutable call counter for one pipeline run.
#[derive(Debug)]
pub struct ProviderBudget {
    limit: u32,
    used: u32,
    exhausted: bool,
}

impl ProviderBudget {
    /// Create a budget with the given call ceiling.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            used: 0,
            exhausted: false,
        }
    }

    /// Calls left before the ceiling.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    /// Calls dispatched so far.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// The configured ceiling.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether a call was ever skipped for lack of budget.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Dispatch one provider call if budget remains.
    ///
    /// With no budget left, marks the budget exhausted and returns empty
    /// rows without touching the provider. Otherwise consumes one unit
    /// and delegates.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error unchanged; the unit is consumed
    /// even when the call fails.
    pub async fn search_with_budget(
        &mut self,
        provider: &dyn SearchProvider,
        query: &str,
        count: usize,
    ) -> Result<Vec<ProviderRow>> {
        if self.remaining() == 0 {
            self.exhausted = true;
            tracing::debug!(limit = self.limit, "provider budget exhausted, skipping call");
            return Ok(Vec::new());
        }
        self.used += 1;
        tracing::trace!(query, count, used = self.used, limit = self.limit, "provider call");
        provider.search_web(query, count).await
    }
}
