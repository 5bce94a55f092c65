//! URL handling module for Blog-Gleaner
//!
//! This module provides URL normalization, domain matching, and the
//! URL-pattern rules that decide which links are worth following and which
//! pages are articles.

mod domain;
mod normalize;

use crate::config::SiteConfig;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_site, matches_wildcard};
pub use normalize::normalize_url;

/// What a fetched page is taken to be, judged from its URL alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A single article - extracted and persisted
    Article,
    /// An index, pagination or category page - only mined for links
    Listing,
}

/// URL-pattern rules for one site
#[derive(Debug, Clone)]
pub struct UrlRules {
    domain: String,
    content_markers: Vec<String>,
    exclude_markers: Vec<String>,
    listing_params: Vec<String>,
}

impl UrlRules {
    /// Builds the rules from the site configuration
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            domain: site.domain.to_lowercase(),
            content_markers: non_empty(&site.content_markers),
            exclude_markers: non_empty(&site.exclude_markers),
            listing_params: non_empty(&site.listing_params),
        }
    }

    /// Returns true if the URL is on the target site
    pub fn is_in_domain(&self, url: &Url) -> bool {
        is_same_site(url, &self.domain)
    }

    /// Returns true if the URL looks like a feed, admin page or static asset
    ///
    /// Markers are matched against the path and the query string.
    pub fn is_excluded(&self, url: &Url) -> bool {
        let path = url.path();
        let query = url.query().unwrap_or("");

        self.exclude_markers
            .iter()
            .any(|marker| path.contains(marker.as_str()) || query.contains(marker.as_str()))
    }

    /// Returns true if the path contains a content-section marker
    pub fn has_content_marker(&self, url: &Url) -> bool {
        let path = url.path();
        self.content_markers
            .iter()
            .any(|marker| path.contains(marker.as_str()))
    }

    /// Returns true if the query carries a pagination or category parameter
    pub fn has_listing_param(&self, url: &Url) -> bool {
        url.query_pairs()
            .any(|(key, _)| self.listing_params.iter().any(|p| p == key.as_ref()))
    }

    /// Returns true if the link is likely an article or listing page
    pub fn is_content_bearing(&self, url: &Url) -> bool {
        self.has_content_marker(url) || self.has_listing_param(url)
    }

    /// Classifies a page by URL pattern, never by content
    ///
    /// Article: a content marker is present and no listing parameter is.
    /// Everything else is a listing.
    pub fn classify(&self, url: &Url) -> PageKind {
        if self.has_content_marker(url) && !self.has_listing_param(url) {
            PageKind::Article
        } else {
            PageKind::Listing
        }
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| !v.is_empty()).cloned().collect()
}
