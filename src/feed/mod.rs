//! Domain feed aggregation
//!
//! Builds the domain universe from the public bug-bounty scope lists: one list
//! of exact domains and one of wildcard entries (`*.example.com`). A list that
//! cannot be fetched contributes nothing; it never aborts the collection.

mod source;

pub use source::{HttpListSource, ListSource};

use std::collections::HashSet;

/// Exact-domain scope list
pub const EXACT_DOMAINS_URL: &str =
    "https://raw.githubusercontent.com/arkadiyt/bounty-targets-data/main/data/domains.txt";

/// Wildcard-domain scope list
pub const WILDCARD_DOMAINS_URL: &str =
    "https://raw.githubusercontent.com/arkadiyt/bounty-targets-data/main/data/wildcards.txt";

/// Locations of the two scope lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
    pub exact: String,
    pub wildcard: String,
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            exact: EXACT_DOMAINS_URL.to_string(),
            wildcard: WILDCARD_DOMAINS_URL.to_string(),
        }
    }
}

/// Returns the trimmed line if it carries an entry
fn entry(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

/// Parses exact-domain list lines
pub fn parse_exact_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| entry(l.as_ref()))
        .map(String::from)
        .collect()
}

/// Parses wildcard list lines, stripping the leading `*.` marker from each entry
///
/// ```
/// use formscout::feed::parse_wildcard_list;
///
/// let domains = parse_wildcard_list(&["*.example.com", "*.", "api.test.io"]);
/// assert_eq!(domains, vec!["example.com", "api.test.io"]);
/// ```
pub fn parse_wildcard_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| entry(l.as_ref()))
        .map(|l| l.trim_start_matches("*."))
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect()
}

/// Unions domain lists, keeping first-seen order and exact-string dedup
pub fn merge_domains<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for domain in lists.into_iter().flatten() {
        if seen.insert(domain.clone()) {
            merged.push(domain);
        }
    }
    merged
}

/// Fetches both scope lists and returns the deduplicated domain universe
///
/// Exact-list domains come first, then wildcard-list domains not already seen.
pub async fn collect_domains(source: &dyn ListSource, urls: &FeedUrls) -> Vec<String> {
    let exact = match source.fetch_list(&urls.exact).await {
        Ok(lines) => parse_exact_list(&lines),
        Err(e) => {
            tracing::warn!("Exact-domain list unavailable: {}", e);
            Vec::new()
        }
    };

    let wildcard = match source.fetch_list(&urls.wildcard).await {
        Ok(lines) => parse_wildcard_list(&lines),
        Err(e) => {
            tracing::warn!("Wildcard-domain list unavailable: {}", e);
            Vec::new()
        }
    };

    tracing::info!(
        "Feed: {} exact entries, {} wildcard entries",
        exact.len(),
        wildcard.len()
    );

    merge_domains([exact, wildcard])
}
