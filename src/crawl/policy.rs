// src/crawl/policy.rs
// =============================================================================
// CrawlPolicy: the rules of one crawl run.
//
// - deadline:     absolute point in time; no task entered after it does work
// - max_depth:    how many link hops from a seed we are allowed to go
// - ignored_urls: full-match patterns, checked in order
//
// A policy is built once per run and never changes afterwards, so every task
// can read it through a shared Arc without any locking.
//
// Rust concepts used:
// - Arc<dyn Clock>: a shared trait object, so tests can swap in a manual clock
// - Instant::checked_add: returns None instead of panicking on overflow
// - No interior mutability: only &self methods, so Sync comes for free
// =============================================================================

use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::error::ConfigError;

pub struct CrawlPolicy {
    deadline: Instant,
    max_depth: usize,
    ignored_urls: Vec<Regex>,
    clock: Arc<dyn Clock>,
}

impl CrawlPolicy {
    pub fn new(
        clock: Arc<dyn Clock>,
        deadline: Instant,
        max_depth: usize,
        ignored_urls: Vec<Regex>,
    ) -> Self {
        Self {
            deadline,
            max_depth,
            ignored_urls,
            clock,
        }
    }

    /// Builds a policy whose deadline is `timeout` from the clock's "now".
    pub fn starting_now(
        clock: Arc<dyn Clock>,
        timeout: Duration,
        max_depth: usize,
        ignored_urls: Vec<Regex>,
    ) -> Result<Self, ConfigError> {
        // A huge timeout could overflow Instant; report it as a config error
        let deadline = clock
            .now()
            .checked_add(timeout)
            .ok_or(ConfigError::DeadlineOverflow)?;
        Ok(Self::new(clock, deadline, max_depth, ignored_urls))
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether a page `depth` hops away from its seed may be visited.
    ///
    /// A max depth of 0 visits nothing, not even the seeds.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth <= self.max_depth
    }

    /// Whether links found on a page at `depth` are worth following.
    pub fn follows_links_at(&self, depth: usize) -> bool {
        depth < self.max_depth
    }

    /// Inclusive: at exactly the deadline, no new work starts.
    pub fn deadline_passed(&self) -> bool {
        self.clock.now() >= self.deadline
    }

    /// First matching pattern wins; patterns are already anchored.
    pub fn is_ignored(&self, url: &str) -> bool {
        // any() stops at the first pattern that matches
        self.ignored_urls.iter().any(|pattern| pattern.is_match(url))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why store an Instant deadline instead of the timeout Duration?
//    - Every task would otherwise need to know when the run started
//    - An absolute deadline is one comparison: now() >= deadline
//
// 2. Why go through a Clock trait instead of calling Instant::now()?
//    - Deadline tests would have to really sleep, and would be flaky
//    - ManualClock lets a test move time forward exactly when it wants to
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::compile_full_match;

    #[test]
    fn test_depth_bounds() {
        let clock = Arc::new(ManualClock::new());
        let policy =
            CrawlPolicy::starting_now(clock, Duration::from_secs(1), 2, Vec::new()).unwrap();

        assert!(policy.allows_depth(0));
        assert!(policy.allows_depth(2));
        assert!(!policy.allows_depth(3));
        assert!(policy.follows_links_at(1));
        assert!(!policy.follows_links_at(2));
    }

    #[test]
    fn test_zero_depth_allows_nothing() {
        let clock = Arc::new(ManualClock::new());
        let policy =
            CrawlPolicy::starting_now(clock, Duration::from_secs(1), 0, Vec::new()).unwrap();
        assert!(!policy.allows_depth(0));
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let clock = Arc::new(ManualClock::new());
        let policy =
            CrawlPolicy::starting_now(clock.clone(), Duration::from_secs(5), 1, Vec::new())
                .unwrap();

        clock.advance(Duration::from_secs(4));
        assert!(!policy.deadline_passed());

        clock.advance(Duration::from_secs(1));
        assert!(policy.deadline_passed());
    }

    #[test]
    fn test_ignored_urls_full_match() {
        let clock = Arc::new(ManualClock::new());
        let patterns = vec![
            compile_full_match("C").unwrap(),
            compile_full_match(r".*\.pdf").unwrap(),
        ];
        let policy =
            CrawlPolicy::starting_now(clock, Duration::from_secs(1), 1, patterns).unwrap();

        assert!(policy.is_ignored("C"));
        assert!(policy.is_ignored("http://a.test/doc.pdf"));
        assert!(!policy.is_ignored("CC"));
        assert!(!policy.is_ignored("http://a.test/doc.pdf.html"));
    }
}
