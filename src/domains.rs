//! Authority domain classification.
//!
//! A fixed, ordered allowlist of government, research, and non-profit
//! domains presumed to host trustworthy primary-source data. The list is
//! pure configuration — changing it requires a redeploy, never code
//! changes elsewhere in the pipeline.

/// The flagship general statistical authority index. Seeded separately
/// from the batched sweep and carries its own scoring bonus.
pub const CENSUS_INDEX_DOMAIN: &str = "data.census.gov";

/// Curated authority domains, in sweep order.
pub const PRIORITY_DOMAINS: &[&str] = &[
    CENSUS_INDEX_DOMAIN,
    "census.gov",
    "bls.gov",
    "bea.gov",
    "cdc.gov",
    "ers.usda.gov",
    "fns.usda.gov",
    "hud.gov",
    "huduser.gov",
    "nces.ed.gov",
    "ed.gov",
    "bjs.ojp.gov",
    "cms.gov",
    "samhsa.gov",
    "epa.gov",
    "transportation.gov",
    "bts.gov",
    "fhwa.dot.gov",
    "drought.gov",
    "droughtmonitor.unl.edu",
    "opportunityinsights.org",
    "countyhealthrankings.org",
    "feedingamerica.org",
    "prisonpolicy.org",
    "vera.org",
    "kff.org",
    "tn.gov",
    "virginia.gov",
];

/// Returns `true` if `hostname` is an authority domain or a sub-domain
/// of one.
///
/// A hostname matches an entry when exactly equal or when it ends with
/// `"." + entry` — so `www2.census.gov` matches `census.gov`, while
/// `notcensus.gov` does not.
pub fn is_priority_domain(hostname: &str) -> bool {
    let host = hostname.trim().to_lowercase();
    if host.is_empty() {
        return false;
    }
    PRIORITY_DOMAINS.iter().any(|entry| {
        host == *entry || host.ends_with(&format!(".{entry}"))
    })
}

/// Authority domains covered by the batched Stage A sweep.
///
/// Excludes the census index, which is handled by its own seeding step.
pub fn sweep_domains() -> Vec<&'static str> {
    PRIORITY_DOMAINS
        .iter()
        .copied()
        .filter(|d| *d != CENSUS_INDEX_DOMAIN)
        .collect()
}
