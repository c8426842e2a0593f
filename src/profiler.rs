// src/profiler.rs
// =============================================================================
// A small call-timing facility, written as a decorator.
//
// Profiler::wrap(thing) returns a Profiled<thing> that implements the same
// trait (Crawl or PageParser). Every call goes straight to the wrapped value;
// the wrapper only records how long it took, keyed by "<type>#<method>".
// The wrapped value never knows it is being measured.
//
// Output format (appended to a file, or printed to stdout):
//   Run at Fri, 16 Oct 2026 14:00:00 +0000
//   word_crawler::crawl::coordinator::Coordinator#crawl took 0m 3s 412ms
//   word_crawler::parser::http::HttpPageParser#parse took 0m 9s 87ms
// =============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::any::type_name;
use std::fs::OpenOptions;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::crawl::Crawl;
use crate::error::{CrawlError, FetchError};
use crate::parser::{PageContent, PageParser};
use crate::result::CrawlResult;

/// Cumulative time spent in each measured operation.
#[derive(Debug, Default)]
pub struct ProfilingState {
    data: DashMap<String, Duration>,
}

impl ProfilingState {
    pub fn record(&self, key: String, elapsed: Duration) {
        *self.data.entry(key).or_insert(Duration::ZERO) += elapsed;
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<Duration> {
        self.data.get(key).map(|d| *d)
    }

    /// Writes one line per operation, sorted by key.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut entries: Vec<(String, Duration)> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort();

        for (key, elapsed) in entries {
            writeln!(out, "{} took {}", key, format_duration(elapsed))?;
        }
        Ok(())
    }
}

fn format_duration(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    format!(
        "{}m {}s {}ms",
        total_ms / 60_000,
        (total_ms / 1_000) % 60,
        total_ms % 1_000
    )
}

pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    started_at: DateTime<Utc>,
}

impl Profiler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Arc::new(ProfilingState::default()),
            started_at: Utc::now(),
        }
    }

    pub fn wrap<T>(&self, inner: T) -> Profiled<T> {
        Profiled {
            inner,
            clock: self.clock.clone(),
            state: self.state.clone(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Run at {}", self.started_at.to_rfc2822())?;
        self.state.write(out)?;
        writeln!(out)
    }

    /// Appends the report to `path` (creating it if needed), or prints it.
    pub fn write_data(&self, path: Option<&Path>) -> std::io::Result<()> {
        match path {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                self.write_report(&mut file)
            }
            None => self.write_report(&mut std::io::stdout().lock()),
        }
    }
}

/// A value whose calls are being timed.
pub struct Profiled<T> {
    inner: T,
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
}

impl<T> Profiled<T> {
    async fn measure<F, R>(&self, method: &str, call: F) -> R
    where
        F: Future<Output = R>,
    {
        let start = self.clock.now();
        let output = call.await;
        let elapsed = self.clock.now().saturating_duration_since(start);
        self.state
            .record(format!("{}#{}", type_name::<T>(), method), elapsed);
        output
    }
}

#[async_trait]
impl<T: Crawl> Crawl for Profiled<T> {
    async fn crawl(&self, seeds: &[String]) -> Result<CrawlResult, CrawlError> {
        self.measure("crawl", self.inner.crawl(seeds)).await
    }
}

#[async_trait]
impl<T: PageParser> PageParser for Profiled<T> {
    async fn parse(&self, url: &str) -> Result<PageContent, FetchError> {
        self.measure("parse", self.inner.parse(url)).await
    }
}
