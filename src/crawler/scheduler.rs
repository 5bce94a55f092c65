//! Scheduler for the crawl frontier and pacing
//!
//! This module handles:
//! - Seeding the frontier with normalized start URLs
//! - Handing out URLs first-discovered, first-visited
//! - Enqueueing newly discovered links without duplicates
//! - The randomized delay between processed pages

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::capped_secs;
use crate::state::{CrawlState, RunPhase};
use crate::url::normalize_url;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Randomized pause between processed pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayWindow {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayWindow {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            min_secs: config.min_delay,
            max_secs: config.max_delay,
        }
    }

    /// Draws a delay uniformly from the window
    ///
    /// Both ends are clamped to `[0, MAX_WAIT]` first.
    pub fn sample(&self) -> Duration {
        let min = capped_secs(self.min_secs);
        let max = capped_secs(self.max_secs);
        if max <= min {
            return min;
        }
        capped_secs(rand::thread_rng().gen_range(min.as_secs_f64()..=max.as_secs_f64()))
    }
}

/// Owns the crawl state of one run and decides what to visit next
pub struct Scheduler {
    state: CrawlState,
    delay: DelayWindow,
}

impl Scheduler {
    /// Creates a scheduler with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (page budget and delay window)
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            state: CrawlState::new(config.page_budget),
            delay: DelayWindow::from_config(config),
        }
    }

    /// Overrides the delay window
    pub fn with_delay(mut self, delay: DelayWindow) -> Self {
        self.delay = delay;
        self
    }

    /// Seeds the frontier with start URLs, in the order given
    ///
    /// URLs that fail to normalize are logged and skipped.
    ///
    /// # Returns
    ///
    /// The number of URLs actually enqueued
    pub fn seed<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for raw in urls {
            match normalize_url(raw.as_ref()) {
                Ok(url) => {
                    if self.state.enqueue(url) {
                        added += 1;
                    }
                }
                Err(e) => warn!(url = raw.as_ref(), error = %e, "Skipping invalid start URL"),
            }
        }
        added
    }

    /// Returns the next URL to process, or None once the run is over
    pub fn next_url(&mut self) -> Option<Url> {
        if !self.state.advance() {
            return None;
        }
        self.state.pop_front()
    }

    /// Marks a URL visited; false means it was already visited this run
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.state.mark_visited(url)
    }

    /// Enqueues discovered links, skipping visited and already queued ones
    ///
    /// Links are sorted first so that a page's discoveries enter the
    /// frontier in a stable order.
    ///
    /// # Returns
    ///
    /// The number of newly enqueued URLs
    pub fn enqueue_all(&mut self, links: impl IntoIterator<Item = Url>) -> usize {
        let mut links: Vec<Url> = links.into_iter().collect();
        links.sort();

        let mut added = 0;
        for link in links {
            if self.state.enqueue(link) {
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, frontier = self.state.frontier_len(), "Enqueued new links");
        }
        added
    }

    /// Counts one fetched page against the budget
    pub fn record_processed(&mut self) {
        self.state.record_processed();
    }

    /// Sleeps for a randomized delay before the next page
    pub async fn pause(&self) {
        let delay = self.delay.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }
}
