// src/config.rs
// =============================================================================
// Crawler configuration.
//
// Configuration comes from two places:
// 1. An optional JSON file (camelCase keys, every key optional)
// 2. Command-line flags, which override whatever the file said
//
// The merged CrawlerConfig is then validated into a ValidatedConfig. All
// configuration mistakes (negative depth, zero timeout, bad regex, ...) are
// reported here, before the crawl starts.
//
// Example file:
//   {
//     "startPages": ["https://example.com/"],
//     "ignoredUrls": [".*\\.pdf"],
//     "ignoredWords": ["^.{1,3}$"],
//     "parallelism": 8,
//     "maxDepth": 3,
//     "timeoutSeconds": 10,
//     "popularWordCount": 20
//   }
// =============================================================================

use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Used when neither the file nor a flag sets the value
pub const DEFAULT_MAX_DEPTH: i64 = 1;
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 30;

// The configuration exactly as written in the file.
//
// Numbers that have a "must not be negative" rule are signed here so that
// a negative value turns into a clear ConfigError instead of a serde error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlerConfig {
    pub start_pages: Vec<String>,
    pub ignored_urls: Vec<String>,
    pub ignored_words: Vec<String>,
    pub parallelism: Option<usize>,
    pub max_depth: i64,
    pub timeout_seconds: i64,
    pub popular_word_count: usize,
    pub profile_output_path: Option<PathBuf>,
    pub result_path: Option<PathBuf>,
}

// serde(default) fills missing keys from this impl, so a file without
// "maxDepth" or "timeoutSeconds" still validates.
impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: None,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            popular_word_count: 0,
            profile_output_path: None,
            result_path: None,
        }
    }
}

// The configuration after validation: patterns compiled, numbers checked.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub start_pages: Vec<String>,
    pub ignored_urls: Vec<Regex>,
    pub ignored_words: Vec<Regex>,
    pub parallelism: usize,
    pub max_depth: usize,
    pub timeout: Duration,
    pub popular_word_count: usize,
    pub profile_output_path: Option<PathBuf>,
    pub result_path: Option<PathBuf>,
}

impl CrawlerConfig {
    /// Reads a configuration file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks every value and compiles the patterns.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.max_depth < 0 {
            return Err(ConfigError::NegativeDepth(self.max_depth));
        }
        if self.timeout_seconds <= 0 {
            return Err(ConfigError::NonPositiveTimeout(self.timeout_seconds));
        }

        let parallelism = match self.parallelism {
            Some(0) => return Err(ConfigError::ZeroParallelism),
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        Ok(ValidatedConfig {
            start_pages: self.start_pages,
            ignored_urls: compile_patterns(&self.ignored_urls)?,
            ignored_words: compile_patterns(&self.ignored_words)?,
            parallelism,
            max_depth: self.max_depth as usize,
            timeout: Duration::from_secs(self.timeout_seconds as u64),
            popular_word_count: self.popular_word_count,
            profile_output_path: self.profile_output_path,
            result_path: self.result_path,
        })
    }
}

// Compiles a pattern so that it only matches the WHOLE input.
//
// "C" must match the URL "C" but not "CC" or "https://C", so we anchor it.
// The non-capturing group keeps alternations like "a|b" anchored as a unit.
pub fn compile_full_match(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_full_match(p)).collect()
}
