// src/error.rs
// =============================================================================
// Typed errors for the crawler.
//
// - ConfigError: something is wrong with the configuration we were given.
//   These are detected up front, before a single page is fetched.
// - FetchError: one page could not be fetched or parsed. The crawl engine
//   treats these as "skip this URL", they never abort a run.
// - CrawlError: the only error a whole crawl run can return.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("maxDepth must not be negative (got {0})")]
    NegativeDepth(i64),

    #[error("timeoutSeconds must be greater than zero (got {0})")]
    NonPositiveTimeout(i64),

    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("deadline overflows the clock (timeout too large)")]
    DeadlineOverflow,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
