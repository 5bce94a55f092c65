//! Crawl summary report
//!
//! This module builds the plain-text report written at the end of a run:
//! totals, per-category and per-author frequency tables, and a numbered
//! article index.

use crate::extract::ArticleRecord;
use crate::output::PersistError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub generated_at: DateTime<Utc>,
    pub total_articles: usize,
    pub pages_visited: usize,

    /// Category name and article count, most frequent first
    pub categories: Vec<(String, usize)>,

    /// Author name and article count, most frequent first
    pub authors: Vec<(String, usize)>,

    /// Articles in the order they were found
    pub articles: Vec<ArticleRecord>,
}

/// Builds the summary of a finished crawl
///
/// # Arguments
///
/// * `records` - Articles extracted during the run, in discovery order
/// * `pages_visited` - Number of distinct URLs visited
pub fn generate_summary(records: &[ArticleRecord], pages_visited: usize) -> CrawlSummary {
    let categories = frequency_table(
        records
            .iter()
            .flat_map(|record| record.categories.iter().map(String::as_str)),
    );
    let authors = frequency_table(records.iter().map(|record| record.author.as_str()));

    CrawlSummary {
        generated_at: Utc::now(),
        total_articles: records.len(),
        pages_visited,
        categories,
        authors,
        articles: records.to_vec(),
    }
}

/// Counts occurrences, sorted by count descending then name ascending
fn frequency_table<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut table: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    table
}

/// Formats a crawl summary as text
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str("Blog Crawl Summary\n");
    out.push_str(&"=".repeat(80));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str(&format!("Total articles found: {}\n", summary.total_articles));
    out.push_str(&format!("Total pages visited: {}\n\n", summary.pages_visited));

    out.push_str("Articles by category:\n");
    for (category, count) in &summary.categories {
        out.push_str(&format!("  {}: {}\n", category, count));
    }

    out.push_str("\nArticles by author:\n");
    for (author, count) in &summary.authors {
        out.push_str(&format!("  {}: {}\n", author, count));
    }

    out.push_str("\nArticle index:\n");
    for (i, article) in summary.articles.iter().enumerate() {
        out.push_str(&format!("{}. {} - {}\n", i + 1, article.title, article.url));
        out.push_str(&format!(
            "   Author: {} | Date: {} | Categories: {}\n\n",
            article.author,
            article.publish_date,
            article.categories.join(", ")
        ));
    }

    out
}

/// Writes the formatted summary to `path`
pub fn write_summary(summary: &CrawlSummary, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, format_summary(summary)).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })
}
