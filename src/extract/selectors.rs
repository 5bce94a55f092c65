//! Fallback chains of extraction strategies
//!
//! Each field has an ordered list of strategies, most specific first. A
//! strategy returns `Some` only for non-empty text; the first `Some` wins.

use crate::extract::text::{body_text, element_text};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Subtrees removed from the primary body containers
const BODY_NOISE: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Subtrees removed from the generic content container
const GENERIC_NOISE: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Category names this long or longer are treated as mis-matches
pub const MAX_CATEGORY_LEN: usize = 50;

static CONTENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"content|main|post").unwrap());

static DIV_WITH_CLASS: LazyLock<Selector> = LazyLock::new(|| parse_selector("div[class]"));

/// One way of pulling a value out of a document
pub enum Strategy {
    /// Flattened text of the first element matching the selector
    FirstText(Selector),

    /// Body text of the first element matching the selector, noise removed
    BodyOf {
        selector: Selector,
        noise: &'static [&'static str],
    },

    /// Most plausible content container: `main`, then `article`, then the
    /// first `div` whose class mentions content/main/post
    GenericContainer,
}

impl Strategy {
    /// Runs the strategy; `None` means it found nothing usable
    pub fn apply(&self, document: &Html) -> Option<String> {
        let text = match self {
            Self::FirstText(selector) => document.select(selector).next().map(element_text),
            Self::BodyOf { selector, noise } => document
                .select(selector)
                .next()
                .map(|element| body_text(element, noise)),
            Self::GenericContainer => {
                generic_container(document).map(|element| body_text(element, GENERIC_NOISE))
            }
        };

        text.filter(|t| !t.is_empty())
    }
}

/// Runs strategies in order and returns the first non-empty value
pub fn first_match(document: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy.apply(document))
}

fn generic_container(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&MAIN)
        .next()
        .or_else(|| document.select(&ARTICLE).next())
        .or_else(|| {
            document.select(&DIV_WITH_CLASS).find(|div| {
                div.value()
                    .classes()
                    .any(|class| CONTENT_CLASS.is_match(class))
            })
        })
}

static MAIN: LazyLock<Selector> = LazyLock::new(|| parse_selector("main"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| parse_selector("article"));

pub static TITLE: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    ["h1", ".post-title", ".entry-title", "title"]
        .into_iter()
        .map(|css| Strategy::FirstText(parse_selector(css)))
        .collect()
});

pub static DATE: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    [".post-date", ".entry-date", ".published", "time"]
        .into_iter()
        .map(|css| Strategy::FirstText(parse_selector(css)))
        .collect()
});

pub static AUTHOR: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    [".author", ".post-author", ".entry-author"]
        .into_iter()
        .map(|css| Strategy::FirstText(parse_selector(css)))
        .collect()
});

pub static BODY: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    let mut chain: Vec<Strategy> = [
        ".post-content",
        ".entry-content",
        ".blog-content",
        "article .content",
        ".post-body",
        "article",
    ]
    .into_iter()
    .map(|css| Strategy::BodyOf {
        selector: parse_selector(css),
        noise: BODY_NOISE,
    })
    .collect();

    chain.push(Strategy::GenericContainer);
    chain
});

/// Every selector here contributes; matches are merged, not short-circuited
pub static CATEGORIES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        ".category a",
        ".post-categories a",
        ".tags a",
        ".post-tags a",
        ".entry-categories a",
        ".cat-links a",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

/// Parses one of the constant selectors above
fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("Invalid CSS selector {css}: {e:?}"))
}

/// Collects category names from every category selector
///
/// Keeps discovery order, drops duplicates, empty names and names of
/// `MAX_CATEGORY_LEN` characters or more.
pub fn collect_categories(document: &Html) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for selector in CATEGORIES.iter() {
        for element in document.select(selector) {
            let name = element_text(element);
            if name.is_empty() || name.chars().count() >= MAX_CATEGORY_LEN {
                continue;
            }
            if !categories.contains(&name) {
                categories.push(name);
            }
        }
    }

    categories
}
