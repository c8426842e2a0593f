// src/parser/http.rs
// =============================================================================
// HttpPageParser: fetches a page and hands the HTML to the html module.
//
// Supported URLs:
// - http:// and https:// are fetched with reqwest (non-2xx is an error)
// - file:// is read from the local disk, which is handy for offline runs
//
// Rust concepts used:
// - One reqwest::Client per parser: it keeps a connection pool, so every
//   task reuses connections instead of opening new ones
// - `?` with #[from]: reqwest::Error turns into FetchError::Http by itself
// - map_err: wraps errors that need extra context (the URL or the path)
// =============================================================================

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::{html, PageContent, PageParser};
use crate::error::FetchError;

// Per-request timeout. The crawl deadline is cooperative and never interrupts
// a fetch, so this is what bounds a single slow server.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpPageParser {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HttpPageParser {
    pub fn new(ignored_words: Vec<Regex>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            ignored_words,
        })
    }

    // Returns the page body as text
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match url.scheme() {
            "http" | "https" => {
                let response = self.client.get(url.as_str()).send().await?;
                if !response.status().is_success() {
                    return Err(FetchError::Status(response.status()));
                }
                Ok(response.text().await?)
            }
            "file" => {
                // to_file_path() fails for file URLs with a host, like file://server/x
                let path = url
                    .to_file_path()
                    .map_err(|_| FetchError::UnsupportedScheme(url.to_string()))?;
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| FetchError::Io { path, source })
            }
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<PageContent, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let body = self.fetch(&parsed).await?;
        // The final URL is the base for relative links
        Ok(html::parse_page(&body, &parsed, &self.ignored_words))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::fs instead of std::fs for file URLs?
//    - std::fs blocks the worker thread while the disk is read
//    - tokio::fs runs the read on a blocking pool and lets other tasks go on
//
// 2. What happens on a 404?
//    - reqwest does NOT treat it as an error, so we check the status ourselves
//    - The crawler logs the FetchError and skips the page
// -----------------------------------------------------------------------------
