use url::Url;

/// Strips a single leading `www.` label
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Checks if a host is the given domain or one of its subdomains
///
/// Both sides have any leading `www.` ignored, and the comparison is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use formscout::url::matches_site;
///
/// assert!(matches_site("example.com", "example.com"));
/// assert!(matches_site("www.example.com", "example.com"));
/// assert!(matches_site("blog.example.com", "www.example.com"));
/// assert!(!matches_site("notexample.com", "example.com"));
/// ```
pub fn matches_site(host: &str, domain: &str) -> bool {
    let host = host.to_lowercase();
    let domain = domain.to_lowercase();
    let host = strip_www(&host);
    let domain = strip_www(&domain);

    if domain.is_empty() {
        return false;
    }

    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Checks if a URL belongs to the crawled domain's site
pub fn is_same_site(url: &Url, domain: &str) -> bool {
    url.host_str()
        .map(|host| matches_site(host, domain))
        .unwrap_or(false)
}
