//! Link extraction for frontier expansion
//!
//! Pulls every anchor out of a fetched page and keeps the ones worth
//! visiting:
//! - resolved against the page URL and normalized
//! - on the target site
//! - not a feed, admin page or static asset
//! - content-bearing (content-section path or listing query parameter)

use crate::url::{normalize_url, UrlRules};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Extracts the followable links of a page
///
/// Pure function of its inputs. The result is a set; the scheduler decides
/// the visiting order.
///
/// # Arguments
///
/// * `body` - The page HTML
/// * `source_url` - URL the page was served from, used to resolve relative links
/// * `rules` - URL-pattern rules of the target site
///
/// # Example
///
/// ```
/// use blog_gleaner::config::SiteConfig;
/// use blog_gleaner::crawler::extract_links;
/// use blog_gleaner::url::UrlRules;
/// use url::Url;
///
/// let rules = UrlRules::from_site(&SiteConfig::new("example.com", vec![]));
/// let source = Url::parse("https://example.com/blog/").unwrap();
/// let html = r#"<a href="/blog/first">1</a><a href="/feed">rss</a><a href="https://other.org/blog/x">x</a>"#;
///
/// let links = extract_links(html, &source, &rules);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains(&Url::parse("https://example.com/blog/first").unwrap()));
/// ```
pub fn extract_links(body: &str, source_url: &Url, rules: &UrlRules) -> HashSet<Url> {
    let document = Html::parse_document(body);

    document
        .select(&ANCHOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, source_url))
        .filter(|url| rules.is_in_domain(url))
        .filter(|url| !rules.is_excluded(url))
        .filter(|url| rules.is_content_bearing(url))
        .collect()
}

/// Resolves an href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - URLs that fail to resolve or are not HTTP(S)
pub fn resolve_link(href: &str, source_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = source_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}
