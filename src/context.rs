//! Query context: tokenisation, core terms, location signals, topic rules.
//!
//! Built once per pipeline invocation and immutable for its duration.
//! Everything downstream — seeding, the relevance gate, scoring — reads
//! the query exclusively through this context.

use crate::topics::{active_rules, TopicRule};

/// Words stripped when deriving core terms: articles, prepositions, and
/// generic indicator words that carry no subject matter.
const STOP_WORDS: &[&str] = &[
    "the", "an", "of", "in", "on", "at", "by", "for", "to", "from", "with", "and", "or",
    "per", "over", "under", "about", "rate", "rates", "county", "counties", "state",
    "states", "total", "number", "percent", "percentage", "how", "many", "much",
];

/// A group of aliases naming one geographic area.
#[derive(Debug)]
pub struct LocationSignal {
    /// Canonical name, also usable as a query term.
    pub id: &'static str,
    /// All tokens that indicate this area (postal code plus full name).
    pub aliases: &'static [&'static str],
}

/// The fixed set of recognised state alias groups.
pub const LOCATION_SIGNALS: &[LocationSignal] = &[
    LocationSignal { id: "tennessee", aliases: &["tn", "tennessee"] },
    LocationSignal { id: "virginia", aliases: &["va", "virginia"] },
    LocationSignal { id: "kentucky", aliases: &["ky", "kentucky"] },
    LocationSignal { id: "georgia", aliases: &["ga", "georgia"] },
    LocationSignal { id: "alabama", aliases: &["al", "alabama"] },
    LocationSignal { id: "mississippi", aliases: &["ms", "mississippi"] },
    LocationSignal { id: "arkansas", aliases: &["ar", "arkansas"] },
    LocationSignal { id: "missouri", aliases: &["mo", "missouri"] },
];

/// Vocabulary marking a general statistical/demographic query, which
/// makes it a candidate for census-index seeding.
const CENSUS_SEED_TERMS: &[&str] = &[
    "census",
    "acs",
    "income",
    "poverty",
    "population",
    "housing",
    "household",
    "households",
    "demographic",
    "demographics",
    "education",
    "employment",
    "unemployment",
    "uninsured",
    "earnings",
    "age",
    "race",
];

/// Derived view of one query, immutable for the pipeline run.
#[derive(Debug)]
pub struct QueryContext {
    /// All tokens, lowercased, deduplicated, in first-seen order.
    pub query_terms: Vec<String>,
    /// Query terms minus stop words; falls back to the full term set if
    /// subtraction would empty it.
    pub core_terms: Vec<String>,
    /// Location groups with at least one alias present in the query.
    pub location_signals: Vec<&'static LocationSignal>,
    /// Topic rules triggered by the query, in table order.
    pub active_topic_rules: Vec<&'static TopicRule>,
}

impl QueryContext {
    /// Build the context for `query`.
    pub fn build(query: &str) -> Self {
        let query_terms = tokenize(query);

        let mut core_terms: Vec<String> = query_terms
            .iter()
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .cloned()
            .collect();
        if core_terms.is_empty() {
            core_terms = query_terms.clone();
        }

        let location_signals: Vec<&'static LocationSignal> = LOCATION_SIGNALS
            .iter()
            .filter(|signal| {
                signal
                    .aliases
                    .iter()
                    .any(|alias| query_terms.iter().any(|t| t == alias))
            })
            .collect();

        let active_topic_rules = active_rules(&query_terms);

        tracing::trace!(
            terms = query_terms.len(),
            core = core_terms.len(),
            locations = location_signals.len(),
            topics = active_topic_rules.len(),
            "query context built"
        );

        Self {
            query_terms,
            core_terms,
            location_signals,
            active_topic_rules,
        }
    }

    /// Whether the literal token is present in the query.
    pub fn has_term(&self, term: &str) -> bool {
        self.query_terms.iter().any(|t| t == term)
    }

    /// Whether the query reads as a general statistical/demographic one.
    pub fn looks_like_census_query(&self) -> bool {
        self.query_terms
            .iter()
            .any(|t| CENSUS_SEED_TERMS.contains(&t.as_str()))
    }
}

/// Tokenize a query: lowercase alphanumeric runs of length > 1,
/// deduplicated in first-seen order.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in query.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_token(&mut terms, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_token(&mut terms, current);
    }
    terms
}

fn push_token(terms: &mut Vec<String>, token: String) {
    if token.chars().count() > 1 && !terms.contains(&token) {
        terms.push(token);
    }
}

/// Term match over lowercased text: plain substring for terms longer
/// than three characters, word-boundary match for short terms (protects
/// two-letter state codes from false substring hits).
pub(crate) fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if term.len() > 3 {
        return haystack.contains(term);
    }
    let mut search_from = 0;
    while let Some(found) = haystack[search_from..].find(term) {
        let start = search_from + found;
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        // Terms are ASCII, so stepping one byte past the match start
        // stays on a char boundary.
        search_from = start + 1;
    }
    false
}
