//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited set, FIFO frontier and page budget of one run
//! - `RunPhase`: Idle -> Running -> Done lifecycle of the scheduling loop
//! - `PageOutcome`: explicit per-page result (article, listing, or skip reason)

mod crawl_state;
mod page_outcome;

// Re-export main types
pub use crawl_state::{CrawlState, DoneReason, RunPhase};
pub use page_outcome::{PageOutcome, SkipReason};
