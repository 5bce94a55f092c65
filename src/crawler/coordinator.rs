//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the scheduling loop that ties together:
//! - The frontier scheduler and its visited set
//! - Fetching, with retries
//! - URL classification into article and listing pages
//! - Article extraction and persistence
//! - Link extraction for frontier expansion
//! - The final summary report

use crate::config::{resolve_start_urls, Config};
use crate::crawler::links::extract_links;
use crate::crawler::scheduler::{DelayWindow, Scheduler};
use crate::crawler::{FetchResult, Fetcher};
use crate::extract::{extract_article, ArticleRecord};
use crate::output::{generate_summary, write_summary, ArticleStore, ArticleWriter, FsStore};
use crate::state::{DoneReason, PageOutcome, RunPhase, SkipReason};
use crate::url::{normalize_url, PageKind, UrlRules};
use crate::GleanerError;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

/// What a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Articles extracted, in the order they were found
    pub articles: Vec<ArticleRecord>,

    /// Distinct URLs visited (including failed fetches and redirect targets)
    pub pages_visited: usize,

    /// Pages fetched successfully (counted against the budget)
    pub pages_processed: usize,

    /// Articles with at least one copy that could not be written
    pub save_failures: usize,

    pub done_reason: DoneReason,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ArticleStore = FsStore> {
    scheduler: Scheduler,
    fetcher: Fetcher,
    rules: UrlRules,
    writer: ArticleWriter<S>,
    articles: Vec<ArticleRecord>,
    save_failures: usize,
}

impl Coordinator<FsStore> {
    /// Creates a coordinator from configuration, seeded with the start URLs
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `start_urls` - Resolved start URLs, in frontier order
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(GleanerError)` - The HTTP client could not be built
    pub fn new(config: &Config, start_urls: &[String]) -> Result<Self, GleanerError> {
        let writer = ArticleWriter::new(
            &config.output.base_dir,
            config.output.all_articles_dir.as_str(),
            config.output.max_filename_length,
        );
        Self::with_writer(config, start_urls, writer)
    }
}

impl<S: ArticleStore> Coordinator<S> {
    /// Creates a coordinator that persists through the given writer
    pub fn with_writer(
        config: &Config,
        start_urls: &[String],
        writer: ArticleWriter<S>,
    ) -> Result<Self, GleanerError> {
        let fetcher = Fetcher::from_config(&config.crawler, &config.user_agent)?;

        let mut scheduler = Scheduler::new(&config.crawler);
        let seeded = scheduler.seed(start_urls);
        info!(seeded, "Seeded frontier");

        Ok(Self {
            scheduler,
            fetcher,
            rules: UrlRules::from_site(&config.site),
            writer,
            articles: Vec::new(),
            save_failures: 0,
        })
    }

    /// Overrides the delay between processed pages
    pub fn with_delay(mut self, delay: DelayWindow) -> Self {
        self.scheduler = self.scheduler.with_delay(delay);
        self
    }

    /// Runs the scheduling loop until the frontier empties or the budget is
    /// spent
    ///
    /// Per-page failures never end the run; they surface as skipped pages.
    pub async fn run(mut self) -> CrawlReport {
        info!("Starting crawl");
        let start_time = Instant::now();

        while let Some(url) = self.scheduler.next_url() {
            let outcome = self.process_page(&url).await;

            match &outcome {
                PageOutcome::Article { record, saved } => {
                    info!(url = %url, title = %record.title, saved, "Processed article");
                }
                PageOutcome::EmptyArticle => {
                    warn!(url = %url, "Article page has no body text, not recorded");
                }
                PageOutcome::Listing => info!(url = %url, "Processed listing page"),
                PageOutcome::Skipped(reason) => warn!(url = %url, %reason, "Skipped page"),
            }

            if !outcome.was_fetched() {
                continue;
            }

            self.scheduler.record_processed();
            if let PageOutcome::Article { record, saved } = outcome {
                if !saved {
                    self.save_failures += 1;
                }
                self.articles.push(record);
            }

            let processed = self.scheduler.state().pages_processed();
            if processed % 10 == 0 {
                info!(
                    "Progress: {} pages processed, {} articles, {} in frontier",
                    processed,
                    self.articles.len(),
                    self.scheduler.state().frontier_len()
                );
            }

            self.scheduler.pause().await;
        }

        let done_reason = match self.scheduler.phase() {
            RunPhase::Done(reason) => reason,
            _ => DoneReason::FrontierExhausted,
        };

        let state = self.scheduler.state();
        info!(
            articles = self.articles.len(),
            visited = state.visited_count(),
            processed = state.pages_processed(),
            reason = ?done_reason,
            elapsed_secs = start_time.elapsed().as_secs(),
            "Crawl finished"
        );

        CrawlReport {
            pages_visited: state.visited_count(),
            pages_processed: state.pages_processed(),
            articles: self.articles,
            save_failures: self.save_failures,
            done_reason,
        }
    }

    /// Handles one popped frontier URL
    ///
    /// Marks it visited, fetches it, extracts and saves it if it is an
    /// article, and always mines the body for new links. A redirect target is
    /// marked visited too; if it already was, the page is a duplicate and
    /// nothing is recorded.
    pub async fn process_page(&mut self, url: &Url) -> PageOutcome {
        if !self.scheduler.mark_visited(url) {
            return PageOutcome::Skipped(SkipReason::AlreadyVisited);
        }

        let (final_url, body) = match self.fetcher.fetch(url).await {
            FetchResult::Success { final_url, body } => (final_url, body),
            FetchResult::Failure { reason } => {
                return PageOutcome::Skipped(SkipReason::FetchFailed(reason));
            }
        };

        if &final_url != url {
            match normalize_url(final_url.as_str()) {
                Ok(target) if target != *url => {
                    if !self.scheduler.mark_visited(&target) {
                        debug!(url = %url, target = %target, "Redirected to a visited page");
                        return PageOutcome::Skipped(SkipReason::AlreadyVisited);
                    }
                }
                Ok(_) => {}
                Err(e) => debug!(url = %url, error = %e, "Redirect target not normalizable"),
            }
        }

        let outcome = match self.rules.classify(url) {
            PageKind::Article => {
                let record = extract_article(&body, url.as_str());
                if record.has_body() {
                    let saved = self.writer.save_ok(&record);
                    PageOutcome::Article { record, saved }
                } else {
                    PageOutcome::EmptyArticle
                }
            }
            PageKind::Listing => PageOutcome::Listing,
        };

        let links = extract_links(&body, &final_url, &self.rules);
        let found = links.len();
        let added = self.scheduler.enqueue_all(links);
        debug!(url = %url, found, added, "Link extraction");

        outcome
    }
}

/// Runs a complete crawl and writes the summary report
///
/// Only configuration problems are returned as errors. Everything that goes
/// wrong during the crawl itself is logged and the run still completes with a
/// summary.
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(GleanerError)` - Start URLs could not be resolved or the client
///   could not be built
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, GleanerError> {
    let start_urls = resolve_start_urls(config)?;
    info!(count = start_urls.len(), "Resolved start URLs");

    let coordinator = Coordinator::new(config, &start_urls)?;
    let report = coordinator.run().await;

    let summary = generate_summary(&report.articles, report.pages_visited);
    let summary_path = Path::new(&config.output.summary_path);
    match write_summary(&summary, summary_path) {
        Ok(()) => info!(path = %summary_path.display(), "Wrote summary report"),
        Err(e) => error!(error = %e, "Failed to write summary report"),
    }

    Ok(report)
}
