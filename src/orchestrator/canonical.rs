//! Canonical URL keys for result deduplication.
//!
//! Two provider rows referring to the same page must collapse to one
//! result. The canonical key strips fragments and tracking parameters,
//! sorts the remaining query, removes default ports, and normalises the
//! trailing slash, so equivalent URLs compare equal as plain strings.

use url::Url;

/// Tracking query parameters stripped from the dedup key.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
];

/// Compute the canonical dedup key for a URL.
///
/// Transformations: lowercase scheme/host, drop the fragment, drop
/// default ports, strip tracking parameters, sort remaining query
/// parameters, and remove a trailing slash (unless the path is exactly
/// `"/"`). Unparseable input is returned unchanged — normalisation runs
/// after URL validation, so this path is effectively unreachable in the
/// pipeline.
pub fn canonical_url_key(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let qs: String = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&qs));
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string()
}

/// Extract the lowercase hostname of a URL, if it has one.
pub fn host_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}

fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
