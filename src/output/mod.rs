//! Output module for articles and crawl reports
//!
//! This module handles:
//! - Writing each article to its category folders and the all-articles folder
//! - Generating the plain-text crawl summary
//! - Reading the article index back out of a summary

mod index;
mod summary;
mod writer;

pub use index::{parse_article_index, IndexEntry};
pub use summary::{format_summary, generate_summary, write_summary, CrawlSummary};
pub use writer::{
    fallback_file_name, sanitize_filename, ArticleStore, ArticleWriter, FsStore, SaveReport,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing output files
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
