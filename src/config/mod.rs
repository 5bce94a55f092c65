//! Configuration module for Blog-Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and resolving the run's start URLs.
//!
//! # Example
//!
//! ```no_run
//! use blog_gleaner::config::{load_config, resolve_start_urls};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! let seeds = resolve_start_urls(&config).unwrap();
//! println!("Crawling {} from {} start URLs", config.site.domain, seeds.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, PageRange, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, resolve_start_urls};
