//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured client identification
//! - A bounded retry loop with exponential backoff and jitter
//! - Re-decoding bodies whose declared charset is missing or unreliable

use crate::config::{CrawlerConfig, UserAgentConfig};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use rand::Rng;
use regex::bytes::Regex;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// How far into the body a `<meta charset>` declaration is searched for
const META_SNIFF_LEN: usize = 1024;

/// Longest single wait the crawler will ever sleep, backoff or pacing
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_.:\-]+)"#).unwrap()
});

/// A single failed fetch attempt
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    fn from_send(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Client(error)
        }
    }
}

/// Result of fetching one URL, after all retries
#[derive(Debug)]
pub enum FetchResult {
    /// Page body, decoded to text
    Success {
        /// URL the body was served from, after redirects
        final_url: Url,
        body: String,
    },

    /// Every attempt failed; `reason` describes the last failure
    Failure { reason: String },
}

/// Bounded exponential backoff
///
/// Retry `n` (counting from zero) waits `base^n` seconds plus a uniform
/// jitter in `[0, jitter_seconds]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_backoff_seconds: f64,
    pub jitter_seconds: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_backoff_seconds: config.base_backoff_seconds,
            jitter_seconds: config.backoff_jitter_seconds,
        }
    }

    /// Wait before retry `attempt`, without jitter, capped at [`MAX_WAIT`]
    pub fn backoff_floor(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        capped_secs(self.base_backoff_seconds.powi(exponent))
    }

    /// Wait before retry `attempt`, jitter included, capped at [`MAX_WAIT`]
    pub fn wait(&self, attempt: u32) -> Duration {
        let jitter_max = capped_secs(self.jitter_seconds).as_secs_f64();
        let jitter = if jitter_max > 0.0 {
            rand::thread_rng().gen_range(0.0..=jitter_max)
        } else {
            0.0
        };
        (self.backoff_floor(attempt) + capped_secs(jitter)).min(MAX_WAIT)
    }
}

/// Converts seconds to a duration in `[0, MAX_WAIT]`
///
/// NaN and negative values become zero; infinite or oversized values become
/// [`MAX_WAIT`].
pub(crate) fn capped_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs)
        .unwrap_or(MAX_WAIT)
        .min(MAX_WAIT)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The client identification sent with every request
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.value.as_str())
        .timeout(timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages one at a time with retry
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds the client and retry policy from configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, FetchError> {
        let client = build_http_client(user_agent, Duration::from_secs(crawler.timeout_seconds))?;
        Ok(Self::new(client, RetryPolicy::from_config(crawler)))
    }

    /// Fetches a URL, retrying transport failures
    ///
    /// Connection errors, timeouts, non-2xx statuses and body read errors are
    /// retried up to `max_retries` times. Decoding never fails and is never
    /// retried.
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        let mut attempt: u32 = 0;

        loop {
            match self.fetch_once(url).await {
                Ok((final_url, body)) => {
                    if attempt > 0 {
                        debug!(url = %url, attempt, "Fetch succeeded after retry");
                    }
                    return FetchResult::Success { final_url, body };
                }
                Err(e) if attempt < self.policy.max_retries => {
                    let wait = self.policy.wait(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        wait_secs = wait.as_secs_f64(),
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Giving up on fetch");
                    return FetchResult::Failure {
                        reason: e.to_string(),
                    };
                }
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<(Url, String), FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok((final_url, decode_body(&bytes, &content_type)))
    }
}

/// Decodes a response body to text
///
/// A charset declared in `content_type` is trusted unless it is missing or
/// one of the Latin-1 defaults servers fall back to. In that case the
/// encoding is detected from, in order: a byte order mark, a `<meta charset>`
/// near the top of the document, UTF-8 validity, and finally windows-1252.
pub fn decode_body(bytes: &[u8], content_type: &str) -> String {
    let encoding = declared_charset(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .filter(|encoding| *encoding != WINDOWS_1252)
        .unwrap_or_else(|| detect_encoding(bytes));

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = encoding.name(), "Body contained undecodable bytes");
    }
    text.into_owned()
}

fn declared_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        })
        .filter(|label| !label.is_empty())
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    if let Some(encoding) = META_CHARSET
        .captures(head)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}
