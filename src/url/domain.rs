use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host, or `None` for URLs without one.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blog_gleaner::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL's host belongs to the target site
///
/// A leading `www.` on either side is ignored, so `www.example.com` and
/// `example.com` are the same site.
pub fn is_same_site(url: &Url, site_pattern: &str) -> bool {
    let Some(domain) = extract_domain(url) else {
        return false;
    };

    let host = strip_www(&domain);
    let pattern = site_pattern.to_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => matches_wildcard(&format!("*.{}", strip_www(base)), host),
        None => matches_wildcard(strip_www(&pattern), host),
    }
}

/// Checks if a host matches a site pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain depth below it. Both sides are expected lowercase.
///
/// ```
/// use blog_gleaner::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(!matches_wildcard("*.example.com", "myexample.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
