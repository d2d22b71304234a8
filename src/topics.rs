//! Static topic rules: trigger-term-to-domain-bonus mappings.
//!
//! A rule activates when the query contains any of its trigger terms.
//! Active rules do two things downstream: their domains receive seed
//! queries in Stage A, and results from those domains receive the rule's
//! score bonus. The table is pure data — adding a topic is an additive
//! change, never a structural one.

/// A subject-matter boost rule.
#[derive(Debug)]
pub struct TopicRule {
    /// Stable rule identifier (used only in logs).
    pub id: &'static str,
    /// Query terms that activate the rule.
    pub trigger_terms: &'static [&'static str],
    /// Authoritative domains for this subject.
    pub domains: &'static [&'static str],
    /// Additive score bonus for results from `domains`.
    pub bonus: i64,
}

/// The full topic rule table.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        id: "chronic-absenteeism",
        trigger_terms: &["absenteeism", "absentee", "attendance", "truancy"],
        domains: &["nces.ed.gov", "ed.gov", "countyhealthrankings.org"],
        bonus: 520,
    },
    TopicRule {
        id: "incarceration",
        trigger_terms: &[
            "incarceration",
            "incarcerated",
            "jail",
            "jails",
            "prison",
            "prisons",
            "recidivism",
        ],
        domains: &["bjs.ojp.gov", "prisonpolicy.org", "vera.org"],
        bonus: 540,
    },
    TopicRule {
        id: "drought",
        trigger_terms: &["drought"],
        domains: &["droughtmonitor.unl.edu", "drought.gov", "ers.usda.gov"],
        bonus: 460,
    },
    TopicRule {
        id: "economic-mobility",
        trigger_terms: &["mobility", "opportunity", "upward"],
        domains: &["opportunityinsights.org", "census.gov", "bea.gov"],
        bonus: 430,
    },
    TopicRule {
        id: "healthcare-program",
        trigger_terms: &["medicaid", "medicare", "chip", "uninsured"],
        domains: &["cms.gov", "kff.org", "samhsa.gov"],
        bonus: 390,
    },
    TopicRule {
        id: "food-security",
        trigger_terms: &["food", "snap", "hunger", "insecurity"],
        domains: &["fns.usda.gov", "feedingamerica.org", "ers.usda.gov"],
        bonus: 480,
    },
    TopicRule {
        id: "transportation",
        trigger_terms: &["transit", "transportation", "commute", "commuting", "traffic"],
        domains: &["bts.gov", "fhwa.dot.gov", "transportation.gov"],
        bonus: 410,
    },
];

/// Select every rule whose trigger terms intersect the query terms.
///
/// Pure set intersection — no per-rule conditionals. Rules come back in
/// table order, which keeps downstream seeding deterministic.
pub fn active_rules(query_terms: &[String]) -> Vec<&'static TopicRule> {
    TOPIC_RULES
        .iter()
        .filter(|rule| {
            rule.trigger_terms
                .iter()
                .any(|trigger| query_terms.iter().any(|term| term == trigger))
        })
        .collect()
}
