//! Text cleanup for extracted fields
//!
//! Scalar fields (title, author, date, category names) are flattened to a
//! single line. Body text keeps one line per structural block.

use regex::Regex;
use scraper::node::Node;
use scraper::ElementRef;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Elements whose boundaries start a new body line
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

/// Collapses markup remnants and whitespace runs into a single-line value
///
/// ```
/// use blog_gleaner::extract::clean_text;
///
/// assert_eq!(clean_text("  Hello <b>bold</b>\n\t world "), "Hello bold world");
/// ```
pub fn clean_text(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, "");
    WHITESPACE_REGEX
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Joins body lines: each stripped, empty ones dropped, single newlines between
pub fn normalize_body(raw: &str) -> String {
    raw.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flattened text of an element, for scalar fields
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Body text of an element with `noise` subtrees left out
///
/// Block elements and `<br>` become line breaks; whitespace inside a text node
/// never does.
pub fn body_text(element: ElementRef<'_>, noise: &[&str]) -> String {
    let mut raw = String::new();
    collect_text(element, noise, &mut raw);
    normalize_body(&raw)
}

fn collect_text(element: ElementRef<'_>, noise: &[&str], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&WHITESPACE_REGEX.replace_all(text, " "));
            }
            Node::Element(el) => {
                let name = el.name();
                if noise.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, noise, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
