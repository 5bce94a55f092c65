//! Reads the article index back out of a summary report

use regex::Regex;
use std::sync::LazyLock;

static INDEX_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.\s+(.*?)\s+-\s+(https?://\S+)\s*$").unwrap());

/// One numbered line of the article index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub number: u32,
    pub title: String,
    pub url: String,
}

/// Parses the `N. title - url` lines of a summary report
///
/// Lines that do not have that shape are ignored, so the whole report can be
/// passed in.
///
/// ```
/// use blog_gleaner::output::parse_article_index;
///
/// let report = "Article index:\n1. Hello - https://example.com/blog/hello\n   Author: Lee\n";
/// let entries = parse_article_index(report);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].url, "https://example.com/blog/hello");
/// ```
pub fn parse_article_index(text: &str) -> Vec<IndexEntry> {
    text.lines()
        .filter_map(|line| {
            let caps = INDEX_LINE.captures(line)?;
            Some(IndexEntry {
                number: caps[1].parse().ok()?,
                title: caps[2].to_string(),
                url: caps[3].to_string(),
            })
        })
        .collect()
}
