//! Crawl bookkeeping for a single run
//!
//! Owns the visited set, the FIFO frontier and the page budget. One instance
//! lives for exactly one run and is dropped with it; nothing is persisted.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Where a run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Created, nothing fetched yet
    Idle,
    /// Inside the scheduling loop
    Running,
    /// Loop left; the reason is recorded
    Done(DoneReason),
}

/// Why the scheduling loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoneReason {
    /// No URL left to visit
    FrontierExhausted,
    /// `pages_processed` reached the page budget
    BudgetReached,
}

impl RunPhase {
    /// Returns true once the run has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Visited set, frontier queue and page budget of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Normalized URLs already fetched (or attempted) this run
    visited: HashSet<String>,

    /// Normalized URLs currently waiting in `frontier`
    queued: HashSet<String>,

    /// URLs to visit, first-discovered first
    frontier: VecDeque<Url>,

    /// Pages fetched successfully so far
    pages_processed: usize,

    /// Maximum value of `pages_processed`
    page_budget: usize,

    phase: RunPhase,
}

impl CrawlState {
    /// Creates an empty state with the given page budget
    pub fn new(page_budget: usize) -> Self {
        Self {
            visited: HashSet::new(),
            queued: HashSet::new(),
            frontier: VecDeque::new(),
            pages_processed: 0,
            page_budget,
            phase: RunPhase::Idle,
        }
    }

    /// Appends a URL to the back of the frontier
    ///
    /// Returns false (and leaves the frontier untouched) if the URL was already
    /// visited or is already waiting in the queue.
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.frontier.push_back(url);
        true
    }

    /// Pops the head of the frontier
    pub fn pop_front(&mut self) -> Option<Url> {
        let url = self.frontier.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    /// Marks a URL visited
    ///
    /// Returns false if it was already visited, in which case the caller must
    /// not fetch it.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Counts one successfully fetched page against the budget
    pub fn record_processed(&mut self) {
        self.pages_processed += 1;
    }

    /// Returns true once the page budget is used up
    pub fn budget_exhausted(&self) -> bool {
        self.pages_processed >= self.page_budget
    }

    /// Decides whether the loop may take another step
    ///
    /// Moves `Idle` to `Running` on the first call and to `Done` once the
    /// frontier is empty or the budget is spent. Budget wins when both hold.
    pub fn advance(&mut self) -> bool {
        if self.phase.is_done() {
            return false;
        }

        if self.budget_exhausted() {
            self.phase = RunPhase::Done(DoneReason::BudgetReached);
            return false;
        }

        if self.frontier.is_empty() {
            self.phase = RunPhase::Done(DoneReason::FrontierExhausted);
            return false;
        }

        self.phase = RunPhase::Running;
        true
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn pages_processed(&self) -> usize {
        self.pages_processed
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}
