//! Article persistence
//!
//! Every record is written once per category folder plus once to the
//! canonical all-articles folder, all copies byte-identical. A write that
//! fails under the sanitized title is retried once under a name derived from
//! the article URL.

use crate::extract::ArticleRecord;
use crate::output::PersistError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Length of the separator line between header and body
const SEPARATOR_LEN: usize = 80;

/// Characters that are illegal in file names on common filesystems
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const UNTITLED: &str = "untitled";
const UNCATEGORIZED_DIR: &str = "Uncategorized";

/// Appended to a category folder whose name clashes with the all-articles folder
const CATEGORY_CLASH_SUFFIX: &str = " (category)";

/// Black-box key to bytes store
pub trait ArticleStore {
    /// Writes `contents` at `path`, replacing anything already there
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PersistError>;
}

/// Filesystem store; creates parent directories on demand
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ArticleStore for FsStore {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Per-target result of one `save`
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Files written, in target order (category folders first)
    pub written: Vec<PathBuf>,

    /// Targets that failed under both names
    pub failures: Vec<PersistError>,

    /// How many targets needed the fallback name
    pub fallbacks: usize,
}

impl SaveReport {
    /// Returns true if every target was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes article records below a base directory
pub struct ArticleWriter<S: ArticleStore = FsStore> {
    store: S,
    base_dir: PathBuf,
    all_articles_dir: String,
    max_filename_length: usize,
}

impl ArticleWriter<FsStore> {
    /// Creates a writer backed by the filesystem
    pub fn new(
        base_dir: impl Into<PathBuf>,
        all_articles_dir: impl Into<String>,
        max_filename_length: usize,
    ) -> Self {
        Self::with_store(FsStore, base_dir, all_articles_dir, max_filename_length)
    }
}

impl<S: ArticleStore> ArticleWriter<S> {
    pub fn with_store(
        store: S,
        base_dir: impl Into<PathBuf>,
        all_articles_dir: impl Into<String>,
        max_filename_length: usize,
    ) -> Self {
        Self {
            store,
            base_dir: base_dir.into(),
            all_articles_dir: all_articles_dir.into(),
            max_filename_length,
        }
    }

    /// Renders the file contents: header block, separator, body
    pub fn render(record: &ArticleRecord) -> String {
        format!(
            "Title: {}\nURL: {}\nAuthor: {}\nDate: {}\nCategories: {}\n{}\n{}",
            record.title,
            record.url,
            record.author,
            record.publish_date,
            record.categories.join(", "),
            "=".repeat(SEPARATOR_LEN),
            record.body
        )
    }

    /// Directories a record is written to: one per category, then the
    /// all-articles folder
    ///
    /// Categories that sanitize to the same folder are written once. A
    /// category named like the all-articles folder gets its own suffixed
    /// folder, so every record still lands in at least two places.
    pub fn target_dirs(&self, record: &ArticleRecord) -> Vec<PathBuf> {
        let all = self.base_dir.join(&self.all_articles_dir);
        let mut dirs: Vec<PathBuf> = Vec::new();

        for category in &record.categories {
            let mut name = sanitize_filename(category, self.max_filename_length);
            if name.is_empty() {
                name = UNCATEGORIZED_DIR.to_string();
            }
            let mut dir = self.base_dir.join(&name);
            if dir == all {
                dir = self.base_dir.join(format!("{}{}", name, CATEGORY_CLASH_SUFFIX));
            }
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        if dirs.is_empty() {
            dirs.push(self.base_dir.join(UNCATEGORIZED_DIR));
        }
        dirs.push(all);
        dirs
    }

    /// Writes a record to all of its targets
    ///
    /// Failures are collected in the report and logged; they never abort the
    /// remaining targets.
    pub fn save(&self, record: &ArticleRecord) -> SaveReport {
        let contents = Self::render(record);
        let file_name = self.file_name(record);
        let fallback_name = fallback_file_name(&record.url);

        let mut report = SaveReport::default();

        for dir in self.target_dirs(record) {
            let primary = dir.join(&file_name);
            match self.store.write(&primary, contents.as_bytes()) {
                Ok(()) => {
                    debug!(path = %primary.display(), "Wrote article");
                    report.written.push(primary);
                }
                Err(e) => {
                    warn!(error = %e, "Write failed, retrying with fallback name");
                    let fallback = dir.join(&fallback_name);
                    match self.store.write(&fallback, contents.as_bytes()) {
                        Ok(()) => {
                            report.fallbacks += 1;
                            report.written.push(fallback);
                        }
                        Err(e) => {
                            error!(url = %record.url, error = %e, "Failed to save article copy");
                            report.failures.push(e);
                        }
                    }
                }
            }
        }

        if report.is_complete() {
            info!(
                title = %record.title,
                copies = report.written.len(),
                "Saved article"
            );
        }

        report
    }

    /// Writes a record and reports whether every copy landed
    pub fn save_ok(&self, record: &ArticleRecord) -> bool {
        self.save(record).is_complete()
    }

    fn file_name(&self, record: &ArticleRecord) -> String {
        let mut title = sanitize_filename(&record.title, self.max_filename_length);
        if title.is_empty() {
            title = UNTITLED.to_string();
        }
        format!("{}.txt", title)
    }
}

/// Strips filesystem-illegal characters and truncates to `max_len` characters
///
/// Control characters are stripped too, and surrounding whitespace and dots
/// are trimmed.
///
/// ```
/// use blog_gleaner::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("A/B:C*D", 100), "ABCD");
/// assert_eq!(sanitize_filename("abcdef", 3), "abc");
/// ```
pub fn sanitize_filename(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();

    let truncated: String = cleaned
        .trim()
        .trim_matches('.')
        .chars()
        .take(max_len)
        .collect();

    truncated.trim_end().to_string()
}

/// Content-hash-derived name used when the title-based name cannot be written
pub fn fallback_file_name(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("article_{}.txt", &digest[..16])
}
