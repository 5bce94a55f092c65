//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and backoff
//! - Link extraction and filtering
//! - Frontier scheduling and pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod links;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{
    build_http_client, decode_body, FetchError, FetchResult, Fetcher, RetryPolicy, MAX_WAIT,
};
pub use links::{extract_links, resolve_link};
pub use scheduler::{DelayWindow, Scheduler};
