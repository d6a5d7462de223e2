//! URL handling for domain crawls
//!
//! Seeds the candidate root URLs for a domain and decides which discovered
//! links stay on the domain's site.

mod matcher;

pub use matcher::{is_same_site, matches_site, strip_www};

/// Returns the candidate root URLs for a domain, in visit order
///
/// # Examples
///
/// ```
/// use formscout::url::seed_urls;
///
/// assert_eq!(
///     seed_urls("example.com"),
///     vec![
///         "https://example.com".to_string(),
///         "https://www.example.com".to_string(),
///         "http://example.com".to_string(),
///     ]
/// );
/// ```
pub fn seed_urls(domain: &str) -> Vec<String> {
    vec![
        format!("https://{}", domain),
        format!("https://www.{}", domain),
        format!("http://{}", domain),
    ]
}
