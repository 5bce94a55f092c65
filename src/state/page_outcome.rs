//! Per-page results consumed by the scheduling loop

use crate::extract::ArticleRecord;
use std::fmt;

/// What happened to one popped frontier URL
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// Article page with a body; `saved` is false if any write target failed
    Article { record: ArticleRecord, saved: bool },

    /// Article-shaped URL whose page yielded no body text
    EmptyArticle,

    /// Listing page, mined for links only
    Listing,

    /// Nothing fetched or nothing usable came back
    Skipped(SkipReason),
}

/// Why a frontier URL produced nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// URL was already in the visited set
    AlreadyVisited,

    /// Every fetch attempt failed at the transport level
    FetchFailed(String),
}

impl PageOutcome {
    /// Returns true if the page was fetched (counts against the budget)
    pub fn was_fetched(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyVisited => write!(f, "already visited"),
            Self::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_was_fetched() {
        assert!(PageOutcome::Listing.was_fetched());
        assert!(PageOutcome::EmptyArticle.was_fetched());
        assert!(!PageOutcome::Skipped(SkipReason::AlreadyVisited).was_fetched());
        assert!(!PageOutcome::Skipped(SkipReason::FetchFailed("timeout".into())).was_fetched());
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::FetchFailed("HTTP 503".to_string());
        assert_eq!(reason.to_string(), "fetch failed: HTTP 503");
    }
}
