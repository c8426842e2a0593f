// src/crawl/coordinator.rs
// =============================================================================
// Coordinator: the entry point of a crawl run.
//
// How it works:
// 1. Build one CrawlPolicy (deadline = now + timeout) and one
//    SharedCrawlState for this run
// 2. Spawn one root CrawlTask per seed URL; seeds run concurrently
// 3. Wait for every root task (and so every descendant) to finish
// 4. Read the totals out of the shared state
//
// The Crawl trait is the seam the profiler wraps: anything that can crawl
// can be timed without the coordinator knowing about it.
//
// Rust concepts used:
// - From<&ValidatedConfig>: `CrawlOptions::from(&config)` converts settings
// - Arc: policy, state, parser and permits are shared by every task
// - JoinSet: waits for all root tasks, whichever finishes first
// =============================================================================

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::policy::CrawlPolicy;
use super::state::SharedCrawlState;
use super::task::CrawlTask;
use crate::clock::Clock;
use crate::config::ValidatedConfig;
use crate::error::{ConfigError, CrawlError};
use crate::parser::PageParser;
use crate::result::CrawlResult;

#[async_trait]
pub trait Crawl: Send + Sync {
    /// Crawls from `seeds` and returns the aggregated word counts.
    async fn crawl(&self, seeds: &[String]) -> Result<CrawlResult, CrawlError>;
}

/// Per-run settings the coordinator turns into a CrawlPolicy.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_depth: usize,
    pub timeout: Duration,
    pub ignored_urls: Vec<Regex>,
    pub parallelism: usize,
}

impl From<&ValidatedConfig> for CrawlOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            timeout: config.timeout,
            ignored_urls: config.ignored_urls.clone(),
            parallelism: config.parallelism,
        }
    }
}

pub struct Coordinator {
    options: CrawlOptions,
    parser: Arc<dyn PageParser>,
    clock: Arc<dyn Clock>,
}

impl Coordinator {
    pub fn new(options: CrawlOptions, parser: Arc<dyn PageParser>, clock: Arc<dyn Clock>) -> Self {
        Self {
            options,
            parser,
            clock,
        }
    }

    fn check_options(&self) -> Result<(), ConfigError> {
        if self.options.parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if self.options.timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout(0));
        }
        Ok(())
    }

    /// Runs a crawl under an explicit policy.
    ///
    /// An empty seed list, a zero max depth or an already elapsed deadline
    /// all finish immediately with an empty result and zero fetches.
    pub async fn crawl_with_policy(&self, seeds: &[String], policy: CrawlPolicy) -> CrawlResult {
        if seeds.is_empty() || policy.max_depth() == 0 {
            return CrawlResult::default();
        }

        // Fresh state per run, so two runs on one coordinator never mix
        let policy = Arc::new(policy);
        let shared = Arc::new(SharedCrawlState::new());
        // One permit per concurrent fetch, shared by the whole task tree
        let fetch_permits = Arc::new(Semaphore::new(self.options.parallelism.max(1)));

        let mut roots = JoinSet::new();
        for seed in seeds {
            let task = CrawlTask::seed(
                seed.clone(),
                policy.clone(),
                shared.clone(),
                self.parser.clone(),
                fetch_permits.clone(),
            );
            roots.spawn(task.run());
        }
        // A root task returns only when its whole subtree is done
        while let Some(joined) = roots.join_next().await {
            // A panicked task is logged; the pages it already merged still count
            if let Err(e) = joined {
                warn!(error = %e, "seed task failed");
            }
        }

        CrawlResult::new(shared.word_counts(), shared.visited_count())
    }
}

#[async_trait]
impl Crawl for Coordinator {
    async fn crawl(&self, seeds: &[String]) -> Result<CrawlResult, CrawlError> {
        self.check_options()?;

        let policy = CrawlPolicy::starting_now(
            self.clock.clone(),
            self.options.timeout,
            self.options.max_depth,
            self.options.ignored_urls.clone(),
        )?;

        info!(
            seeds = seeds.len(),
            max_depth = self.options.max_depth,
            timeout_secs = self.options.timeout.as_secs_f64(),
            parallelism = self.options.parallelism,
            "starting crawl"
        );
        let result = self.crawl_with_policy(seeds, policy).await;
        info!(
            urls_visited = result.urls_visited,
            distinct_words = result.word_counts.len(),
            "crawl finished"
        );

        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn the seeds instead of awaiting them one by one?
//    - Awaiting in a loop would crawl seed 2 only after seed 1 is finished
//    - Spawned roots run at the same time and race for the same visited set
//
// 2. Why does crawl_with_policy take a CrawlPolicy argument?
//    - Tests can hand in a policy with a manual clock or an elapsed deadline
//    - crawl() is just "build a policy from now, then crawl_with_policy"
// -----------------------------------------------------------------------------
