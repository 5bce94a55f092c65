//! Article extraction
//!
//! Turns a fetched article page into an `ArticleRecord` by running the
//! fallback chains in `selectors` for each field:
//! - title, author, date: first non-empty match, else a fixed placeholder
//! - body: specific containers first, then a generic content container
//! - categories: all tag/category matches merged, else `Uncategorized`

mod selectors;
mod text;

pub use selectors::{collect_categories, first_match, Strategy, MAX_CATEGORY_LEN};
pub use text::{body_text, clean_text, element_text, normalize_body};

use scraper::Html;

pub const UNKNOWN_TITLE: &str = "unknown title";
pub const UNKNOWN_AUTHOR: &str = "unknown author";
pub const UNKNOWN_DATE: &str = "unknown date";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Structured data recovered from one article page
///
/// Created once per article page and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub body: String,
    /// Never empty; discovery order, duplicates removed
    pub categories: Vec<String>,
    pub url: String,
    pub publish_date: String,
    pub author: String,
}

impl ArticleRecord {
    /// Returns true if body extraction found any text
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Extracts an article record from a page body
///
/// Never fails: every scalar field falls back to its placeholder and the
/// category list falls back to `["Uncategorized"]`. Only the body may come
/// back empty.
///
/// # Example
///
/// ```
/// use blog_gleaner::extract::extract_article;
///
/// let html = r#"<html><body><h1>Hello</h1>
///     <div class="entry-content"><p>First</p><p>Second</p></div>
///     <span class="cat-links"><a href="/c/tech">Tech</a></span></body></html>"#;
/// let record = extract_article(html, "https://example.com/blog/hello");
/// assert_eq!(record.title, "Hello");
/// assert_eq!(record.body, "First\nSecond");
/// assert_eq!(record.categories, vec!["Tech"]);
/// assert_eq!(record.author, "unknown author");
/// ```
pub fn extract_article(body: &str, url: &str) -> ArticleRecord {
    let document = Html::parse_document(body);

    let title = first_match(&document, &selectors::TITLE)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let publish_date = first_match(&document, &selectors::DATE)
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    let author = first_match(&document, &selectors::AUTHOR)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let text = first_match(&document, &selectors::BODY).unwrap_or_default();

    let mut categories = collect_categories(&document);
    if categories.is_empty() {
        categories.push(UNCATEGORIZED.to_string());
    }

    ArticleRecord {
        title,
        body: text,
        categories,
        url: url.to_string(),
        publish_date,
        author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html>
        <head><title>Site | My Post</title></head>
        <body>
            <header><nav><a href="/">Home</a></nav></header>
            <article>
                <h1 class="entry-title">My   Post</h1>
                <span class="entry-date">2021-05-01</span>
                <span class="author"><a href="/u/lee">Lee</a></span>
                <div class="entry-content">
                    <p>Paragraph one.</p>
                    <script>track();</script>
                    <p>Paragraph
                       two.</p>
                </div>
                <footer>
                    <span class="cat-links"><a href="/c/tech">Tech</a>, <a href="/c/life">Life</a></span>
                    <span class="tags"><a href="/t/rust">Rust</a></span>
                </footer>
            </article>
        </body>
        </html>
    "#;

    #[test]
    fn test_full_extraction() {
        let record = extract_article(FULL_PAGE, "https://example.com/blog/my-post");

        assert_eq!(record.title, "My Post");
        assert_eq!(record.publish_date, "2021-05-01");
        assert_eq!(record.author, "Lee");
        assert_eq!(record.body, "Paragraph one.\nParagraph two.");
        assert_eq!(record.categories, vec!["Rust", "Tech", "Life"]);
        assert_eq!(record.url, "https://example.com/blog/my-post");
        assert!(record.has_body());
    }

    #[test]
    fn test_all_fields_fall_back() {
        let record = extract_article("<html><body></body></html>", "https://example.com/blog/x");

        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.publish_date, UNKNOWN_DATE);
        assert_eq!(record.categories, vec![UNCATEGORIZED]);
        assert!(!record.has_body());
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let record = extract_article(
            "<html><head><title> Only Title </title></head><body><p>x</p></body></html>",
            "https://example.com/blog/x",
        );
        assert_eq!(record.title, "Only Title");
    }

    #[test]
    fn test_body_from_generic_container() {
        let record = extract_article(
            r#"<html><body><div class="main-area"><header>Top</header>
               <p>Only the body</p><aside>Related</aside></div></body></html>"#,
            "https://example.com/blog/x",
        );
        assert_eq!(record.body, "Only the body");
    }
}
