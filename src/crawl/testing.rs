// src/crawl/testing.rs
// =============================================================================
// Test helpers: an in-memory link graph that pretends to be the web.
//
// GraphParser records how many times each URL was parsed, so tests can assert
// the exactly-once property. Unknown URLs fail like a 404 would.
// =============================================================================

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::FetchError;
use crate::parser::{PageContent, PageParser};

type ParseHook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct GraphParser {
    pages: HashMap<String, PageContent>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: DashMap<String, usize>,
    on_parse: Option<ParseHook>,
}

impl GraphParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page with the given outbound links and word counts.
    pub fn page(mut self, url: &str, links: &[&str], words: &[(&str, usize)]) -> Self {
        let content = PageContent {
            links: links.iter().map(|l| l.to_string()).collect(),
            word_counts: words.iter().map(|(w, c)| (w.to_string(), *c)).collect(),
        };
        self.pages.insert(url.to_string(), content);
        self
    }

    /// Makes `url` fail with a server error.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Makes fetching `url` take `delay` of real time.
    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Runs `hook` every time a page is parsed, before the result is returned.
    pub fn on_parse(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_parse = Some(Box::new(hook));
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| *c.value()).sum()
    }

    pub fn parsed_urls(&self) -> HashSet<String> {
        self.calls.iter().map(|c| c.key().clone()).collect()
    }
}

/// The graph used by most tests: A -> {B, C}, B -> D, C and D have no links.
pub fn abcd_graph() -> GraphParser {
    GraphParser::new()
        .page("A", &["B", "C"], &[("x", 1)])
        .page("B", &["D"], &[("x", 1)])
        .page("C", &[], &[("x", 1)])
        .page("D", &[], &[("x", 1)])
}

#[async_trait]
impl PageParser for GraphParser {
    async fn parse(&self, url: &str) -> Result<PageContent, FetchError> {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;

        // Give other tasks a chance to run so races actually happen.
        tokio::task::yield_now().await;
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(hook) = &self.on_parse {
            hook(url);
        }
        if self.failing.contains(url) {
            return Err(FetchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}
