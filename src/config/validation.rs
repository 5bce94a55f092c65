use crate::config::types::{Config, CrawlerConfig, OutputConfig, PageRange, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Largest accepted backoff base; `base^max_retries` is capped at sleep time
const MAX_BACKOFF_BASE: f64 = 60.0;

/// Largest accepted jitter or inter-page delay, in seconds
const MAX_PAUSE_SECONDS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;

    if config.user_agent.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler pacing configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if !(1.0..=MAX_BACKOFF_BASE).contains(&config.base_backoff_seconds) {
        return Err(ConfigError::Validation(format!(
            "base-backoff-seconds must be between 1 and {}, got {}",
            MAX_BACKOFF_BASE, config.base_backoff_seconds
        )));
    }

    if !(0.0..=MAX_PAUSE_SECONDS).contains(&config.backoff_jitter_seconds) {
        return Err(ConfigError::Validation(format!(
            "backoff-jitter-seconds must be between 0 and {}, got {}",
            MAX_PAUSE_SECONDS, config.backoff_jitter_seconds
        )));
    }

    let pause_range = 0.0..=MAX_PAUSE_SECONDS;
    if !pause_range.contains(&config.min_delay) || !pause_range.contains(&config.max_delay) {
        return Err(ConfigError::Validation(format!(
            "delays must be between 0 and {}, got min-delay={} max-delay={}",
            MAX_PAUSE_SECONDS, config.min_delay, config.max_delay
        )));
    }

    if config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "min-delay ({}) must not exceed max-delay ({})",
            config.min_delay, config.max_delay
        )));
    }

    if config.page_budget < 1 {
        return Err(ConfigError::Validation(
            "page-budget must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_domain_pattern(&config.domain)?;

    if config.content_markers.iter().all(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "content-markers must contain at least one non-empty marker".to_string(),
        ));
    }

    if let Some(range) = &config.page_range {
        validate_page_range(range)?;
    }

    Ok(())
}

fn validate_page_range(range: &PageRange) -> Result<(), ConfigError> {
    if range.start > range.end {
        return Err(ConfigError::Validation(format!(
            "page-range start ({}) must not exceed end ({})",
            range.start, range.end
        )));
    }

    validate_http_url(&range.base)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_dir.is_empty() {
        return Err(ConfigError::Validation(
            "base-dir cannot be empty".to_string(),
        ));
    }

    if config.all_articles_dir.is_empty() {
        return Err(ConfigError::Validation(
            "all-articles-dir cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if config.max_filename_length < 1 || config.max_filename_length > 255 {
        return Err(ConfigError::Validation(format!(
            "max-filename-length must be between 1 and 255, got {}",
            config.max_filename_length
        )));
    }

    Ok(())
}

/// Validates the merged start URL list
pub fn validate_start_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one start URL is required (start-urls, start-list or page-range)"
                .to_string(),
        ));
    }

    for url in urls {
        validate_http_url(url)?;
    }

    Ok(())
}

fn validate_http_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' must use http or https",
            url
        )));
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
