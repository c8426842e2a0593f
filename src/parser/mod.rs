// src/parser/mod.rs
// =============================================================================
// The fetch/parse service.
//
// Given a URL, a PageParser returns the page's outbound links and its word
// counts, or a FetchError. The crawl engine only talks to the PageParser
// trait, so tests can plug in an in-memory link graph instead of the network.
//
// Submodules:
// - html: extracts links and words from an HTML document
// - http: HttpPageParser, the real implementation (http, https and file URLs)
//
// Rust concepts used:
// - #[async_trait]: plain traits cannot have async methods that are usable
//   as trait objects, so the macro boxes the returned future for us
// - Send + Sync supertraits: one parser is shared by tasks on many threads
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::FetchError;

pub use http::HttpPageParser;

/// Everything the crawler needs from one page.
///
/// Links are absolute URLs, in document order, duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub links: Vec<String>,
    pub word_counts: HashMap<String, usize>,
}

#[async_trait]
pub trait PageParser: Send + Sync {
    /// Fetches `url` and parses it. Retries, if any, are the implementation's
    /// business; the crawler treats an error as "skip this page".
    async fn parse(&self, url: &str) -> Result<PageContent, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait and not just the HTTP struct?
//    - The crawl engine holds an Arc<dyn PageParser>, so it does not care
//      where pages come from
//    - The profiler wraps any PageParser to time it, without changing it
//
// 2. Why return word counts and not the raw HTML?
//    - The crawler only merges counts; parsing stays on the parser's side
// -----------------------------------------------------------------------------
