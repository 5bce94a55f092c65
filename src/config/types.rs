use serde::Deserialize;

/// Main configuration structure for Blog-Gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler pacing and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Retries after the first attempt on transport failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff (seconds)
    #[serde(rename = "base-backoff-seconds")]
    pub base_backoff_seconds: f64,

    /// Upper bound of the uniform jitter added to each backoff wait (seconds)
    #[serde(rename = "backoff-jitter-seconds")]
    pub backoff_jitter_seconds: f64,

    /// Lower bound of the delay between processed pages (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the delay between processed pages (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,

    /// Maximum number of pages fetched in one run
    #[serde(rename = "page-budget")]
    pub page_budget: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 3,
            base_backoff_seconds: 2.0,
            backoff_jitter_seconds: 1.0,
            min_delay: 1.0,
            max_delay: 3.0,
            page_budget: 500,
        }
    }
}

/// Client identification sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// The blog being crawled and how its URLs are recognised
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Target host pattern (e.g., "example.com" or "*.example.com")
    pub domain: String,

    /// Explicit start URLs
    #[serde(rename = "start-urls", default)]
    pub start_urls: Vec<String>,

    /// Optional text file with one start URL per line
    #[serde(rename = "start-list", default)]
    pub start_list: Option<String>,

    /// Optional `{base}?paged={n}` listing range
    #[serde(rename = "page-range", default)]
    pub page_range: Option<PageRange>,

    /// Path fragments that mark content sections
    #[serde(rename = "content-markers", default = "default_content_markers")]
    pub content_markers: Vec<String>,

    /// Path fragments that mark feeds, admin pages and static assets
    #[serde(rename = "exclude-markers", default = "default_exclude_markers")]
    pub exclude_markers: Vec<String>,

    /// Query parameters that mark listing (pagination/category) pages
    #[serde(rename = "listing-params", default = "default_listing_params")]
    pub listing_params: Vec<String>,
}

/// Inclusive range of paginated listing pages
#[derive(Debug, Clone, Deserialize)]
pub struct PageRange {
    pub base: String,
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Expands the range into `{base}?paged={n}` URLs
    pub fn urls(&self) -> Vec<String> {
        (self.start..=self.end)
            .map(|n| format!("{}?paged={}", self.base, n))
            .collect()
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for category folders
    #[serde(rename = "base-dir")]
    pub base_dir: String,

    /// Folder (under base-dir) holding the canonical copy of every article
    #[serde(rename = "all-articles-dir")]
    pub all_articles_dir: String,

    /// Path to the summary report
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Maximum length (in characters) of a sanitized file name stem
    #[serde(rename = "max-filename-length")]
    pub max_filename_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: "blog_content".to_string(),
            all_articles_dir: "AllArticles".to_string(),
            summary_path: "crawl_summary.txt".to_string(),
            max_filename_length: 100,
        }
    }
}

fn default_content_markers() -> Vec<String> {
    ["/blog/", "/article/", "/post/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_markers() -> Vec<String> {
    ["/feed", "/wp-json", "/wp-admin", "/wp-content", ".xml", ".rss"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_listing_params() -> Vec<String> {
    ["cat", "paged"].iter().map(|s| s.to_string()).collect()
}

impl SiteConfig {
    /// Builds a site description with the default marker lists
    pub fn new(domain: &str, start_urls: Vec<String>) -> Self {
        Self {
            domain: domain.to_string(),
            start_urls,
            start_list: None,
            page_range: None,
            content_markers: default_content_markers(),
            exclude_markers: default_exclude_markers(),
            listing_params: default_listing_params(),
        }
    }
}
