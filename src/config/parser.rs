use crate::config::types::Config;
use crate::config::validation::{validate, validate_start_urls};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use blog_gleaner::config::load_config;
///
/// let config = load_config(Path::new("gleaner.toml")).unwrap();
/// println!("Page budget: {}", config.crawler.page_budget);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart by their settings.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Collects the run's start URLs
///
/// Order: explicit `start-urls`, then the lines of `start-list`, then the
/// expanded `page-range`. Duplicates are kept; the frontier drops them.
///
/// # Errors
///
/// * `ConfigError::StartList` - the start list file cannot be read
/// * `ConfigError::Validation` - no start URL remains after merging
/// * `ConfigError::InvalidUrl` - a start URL is not an absolute http(s) URL
pub fn resolve_start_urls(config: &Config) -> Result<Vec<String>, ConfigError> {
    let site = &config.site;
    let mut urls = site.start_urls.clone();

    if let Some(list_path) = &site.start_list {
        let content =
            std::fs::read_to_string(list_path).map_err(|source| ConfigError::StartList {
                path: list_path.clone(),
                source,
            })?;
        urls.extend(parse_start_list(&content));
    }

    if let Some(range) = &site.page_range {
        urls.extend(range.urls());
    }

    validate_start_urls(&urls)?;

    Ok(urls)
}

/// Parses a start list: one URL per line, blank lines and `#` comments ignored
fn parse_start_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
timeout-seconds = 10
max-retries = 2
min-delay = 0.5
max-delay = 1.5
page-budget = 50

[site]
domain = "example.com"
start-urls = ["https://example.com/blog/"]

[output]
base-dir = "./out"
"#;

        let file = create_temp_file(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.timeout_seconds, 10);
        assert_eq!(config.crawler.max_retries, 2);
        assert_eq!(config.crawler.page_budget, 50);
        // Unset knobs fall back to defaults
        assert_eq!(config.crawler.base_backoff_seconds, 2.0);
        assert_eq!(config.output.all_articles_dir, "AllArticles");
        assert_eq!(config.output.base_dir, "./out");
        assert_eq!(config.site.content_markers.len(), 3);
        assert!(config.user_agent.value.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/gleaner.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_file("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
min-delay = 5.0
max-delay = 1.0

[site]
domain = "example.com"
start-urls = ["https://example.com/blog/"]
"#;

        let file = create_temp_file(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_resolve_merges_all_sources() {
        let list = create_temp_file("# seeds\nhttps://example.com/blog/a\n\n  https://example.com/blog/b  \n");
        let config_content = format!(
            r#"
[site]
domain = "example.com"
start-urls = ["https://example.com/blog/"]
start-list = "{}"

[site.page-range]
base = "https://example.com/blog/"
start = 1
end = 2
"#,
            list.path().display()
        );

        let file = create_temp_file(&config_content);
        let config = load_config(file.path()).unwrap();
        let urls = resolve_start_urls(&config).unwrap();

        assert_eq!(
            urls,
            vec![
                "https://example.com/blog/",
                "https://example.com/blog/a",
                "https://example.com/blog/b",
                "https://example.com/blog/?paged=1",
                "https://example.com/blog/?paged=2",
            ]
        );
    }

    #[test]
    fn test_resolve_unreadable_start_list() {
        let config_content = r#"
[site]
domain = "example.com"
start-list = "/nonexistent/urls.txt"
"#;

        let file = create_temp_file(config_content);
        let config = load_config(file.path()).unwrap();
        let result = resolve_start_urls(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::StartList { .. }));
    }

    #[test]
    fn test_resolve_requires_a_start_url() {
        let config_content = r#"
[site]
domain = "example.com"
"#;

        let file = create_temp_file(config_content);
        let config = load_config(file.path()).unwrap();
        assert!(matches!(
            resolve_start_urls(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_file("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }
}
