// src/crawl/task.rs
// =============================================================================
// CrawlTask: the recursive unit of work for one URL.
//
// What one task does, in order:
// 1. Depth check     - too far from the seed? stop.
// 2. Deadline check  - past the deadline? stop. (Checked on entry only: a
//                      task that got past this point finishes its fetch.)
// 3. Exclusion check - URL matches an ignored pattern? stop.
// 4. Claim           - atomically mark the URL visited; lost the race? stop.
//                      (Reached by a shorter path than before? re-expand the
//                      cached links from here, without fetching again.)
// 5. Fetch/parse     - failure means "skip this page", never an error.
// 6. Merge           - add the page's word counts to the shared totals.
// 7. Recurse         - spawn one child per link and wait for ALL of them.
//
// Step 7 is a fork/join: a task is only finished when every task it spawned,
// directly or transitively, is finished. That is how the coordinator knows
// when the whole crawl is done.
//
// Rust concepts:
// - BoxFuture: an async fn cannot call itself directly (its future type
//   would be infinitely large), so run() boxes the future
// - JoinSet: owns the spawned children and lets us wait for all of them
// - Semaphore: bounds how many fetches run at the same time
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::policy::CrawlPolicy;
use super::state::{Claim, SharedCrawlState};
use crate::parser::PageParser;

pub struct CrawlTask {
    url: String,
    depth: usize,
    policy: Arc<CrawlPolicy>,
    shared: Arc<SharedCrawlState>,
    parser: Arc<dyn PageParser>,
    fetch_permits: Arc<Semaphore>,
}

impl CrawlTask {
    /// Creates the task for a seed URL (depth 0).
    pub fn seed(
        url: String,
        policy: Arc<CrawlPolicy>,
        shared: Arc<SharedCrawlState>,
        parser: Arc<dyn PageParser>,
        fetch_permits: Arc<Semaphore>,
    ) -> Self {
        Self {
            url,
            depth: 0,
            policy,
            shared,
            parser,
            fetch_permits,
        }
    }

    // Builds the task for a link found on a page expanded at `parent_depth`
    fn child(&self, url: String, parent_depth: usize) -> Self {
        Self {
            url,
            depth: parent_depth + 1,
            // Cloning an Arc only bumps a reference count; every child shares
            // the same policy, state, parser and permits
            policy: self.policy.clone(),
            shared: self.shared.clone(),
            parser: self.parser.clone(),
            fetch_permits: self.fetch_permits.clone(),
        }
    }

    /// Runs this task and all of its descendants to completion.
    pub fn run(self) -> BoxFuture<'static, ()> {
        self.execute().boxed()
    }

    async fn execute(self) {
        // Steps 1-3: cheap checks that need no shared state
        if !self.policy.allows_depth(self.depth) {
            return;
        }
        if self.policy.deadline_passed() {
            debug!(url = %self.url, "deadline passed, not visiting");
            return;
        }
        if self.policy.is_ignored(&self.url) {
            debug!(url = %self.url, "ignored by pattern");
            return;
        }

        // Steps 4-6: claim, and fetch + merge if we are the first
        let (links, expand_depth) = match self.shared.claim(&self.url, self.depth) {
            Claim::Skip => return,
            Claim::Reexpand(links) => {
                // Fetched before through a longer path; only the links matter
                debug!(url = %self.url, depth = self.depth, "re-expanding from shorter path");
                (links, self.depth)
            }
            Claim::Fetch => match self.fetch_and_merge().await {
                Some(expansion) => expansion,
                None => return,
            },
        };

        // Step 7: fork one child per link, then join all of them
        if !self.policy.follows_links_at(expand_depth) {
            return;
        }

        let mut children = JoinSet::new();
        for link in links.iter() {
            children.spawn(self.child(link.clone(), expand_depth).run());
        }
        // join_next() yields each child as it finishes; the loop ends only
        // when the set is empty, i.e. every child (and its subtree) is done
        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                warn!(parent = %self.url, error = %e, "crawl task failed");
            }
        }
    }

    // Fetches the claimed page and merges its words.
    //
    // Returns the page's links and the depth to expand them from, which can be
    // shallower than our own if a shorter path showed up during the fetch.
    async fn fetch_and_merge(&self) -> Option<(Arc<[String]>, usize)> {
        let page = {
            // The permit is dropped at the end of this block, BEFORE we wait
            // on our children, so a parent never holds a slot its children need
            //
            // The semaphore is never closed, so acquire() cannot fail here.
            let Ok(_permit) = self.fetch_permits.acquire().await else {
                return None;
            };
            self.parser.parse(&self.url).await
        };

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %self.url, error = %e, "skipping page");
                // Record "no links" so a shorter path has nothing to re-expand
                self.shared.record_links(&self.url, Arc::from(Vec::new()));
                return None;
            }
        };
        debug!(url = %self.url, depth = self.depth, links = page.links.len(), "visited");

        // Merge exactly once: only the task that got Claim::Fetch gets here
        self.shared.add_counts(&page.word_counts);

        let links: Arc<[String]> = page.links.into();
        let expand_depth = self.shared.record_links(&self.url, links.clone())?;
        Some((links, expand_depth))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::spawn (via JoinSet) instead of join_all?
//    - join_all polls every child on the CURRENT task, so a big subtree runs
//      on one thread
//    - spawn() hands each child to the runtime, which can run them on all
//      worker threads in parallel
//
// 2. Why does run() take `self` by value?
//    - A spawned future must be 'static: it cannot borrow from its parent
//    - Owning its URL and Arcs lets each task outlive the stack frame that
//      created it
//
// 3. Why is the deadline only checked at the start?
//    - Cancelling a fetch halfway would make "was this page visited?" depend
//      on timing
//    - Checking on entry means a task either does all of its work or none
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crawl::testing::{abcd_graph, GraphParser};
    use std::time::Duration;

    struct Harness {
        parser: Arc<GraphParser>,
        shared: Arc<SharedCrawlState>,
        policy: Arc<CrawlPolicy>,
    }

    impl Harness {
        fn new(parser: GraphParser, max_depth: usize) -> Self {
            let clock = Arc::new(ManualClock::new());
            let policy =
                CrawlPolicy::starting_now(clock, Duration::from_secs(60), max_depth, Vec::new())
                    .unwrap();
            Self {
                parser: Arc::new(parser),
                shared: Arc::new(SharedCrawlState::new()),
                policy: Arc::new(policy),
            }
        }

        async fn crawl(&self, seed: &str) {
            CrawlTask::seed(
                seed.to_string(),
                self.policy.clone(),
                self.shared.clone(),
                self.parser.clone(),
                Arc::new(Semaphore::new(4)),
            )
            .run()
            .await;
        }
    }

    #[tokio::test]
    async fn test_task_waits_for_all_descendants() {
        let harness = Harness::new(abcd_graph(), 2);
        harness.crawl("A").await;

        // By the time the seed's future resolves, the grandchild is done too.
        assert_eq!(harness.parser.calls("D"), 1);
        assert_eq!(harness.shared.word_counts().get("x"), Some(&4));
    }

    #[tokio::test]
    async fn test_leaf_depth_is_visited_but_not_expanded() {
        let harness = Harness::new(abcd_graph(), 1);
        harness.crawl("A").await;

        assert_eq!(harness.parser.calls("B"), 1);
        assert_eq!(harness.parser.calls("D"), 0);
    }

    #[tokio::test]
    async fn test_failed_page_is_claimed_but_not_counted() {
        let parser = GraphParser::new()
            .page("A", &["B", "C"], &[("x", 1)])
            .failing("B")
            .page("C", &[], &[("x", 1)]);
        let harness = Harness::new(parser, 3);
        harness.crawl("A").await;

        assert_eq!(harness.parser.calls("B"), 1);
        assert_eq!(harness.shared.word_counts().get("x"), Some(&2));
        assert_eq!(harness.shared.visited_count(), 3);
    }

    #[tokio::test]
    async fn test_already_claimed_url_is_not_fetched() {
        let harness = Harness::new(abcd_graph(), 2);
        // Claimed at the same depth A would reach it at, fetch still running.
        assert_eq!(harness.shared.claim("B", 1), Claim::Fetch);

        harness.crawl("A").await;

        assert_eq!(harness.parser.calls("B"), 0);
        assert_eq!(harness.parser.calls("D"), 0);
        assert_eq!(harness.shared.word_counts().get("x"), Some(&2));
    }

    #[tokio::test]
    async fn test_shorter_path_reexpands_without_refetching() {
        // X was already fetched through a longer path and left unexpanded at
        // depth 3; reaching it again at depth 1 must still reach Y.
        let parser = GraphParser::new()
            .page("A", &["X"], &[("x", 1)])
            .page("X", &["Y"], &[("x", 1)])
            .page("Y", &[], &[("y", 1)]);
        let harness = Harness::new(parser, 3);
        assert_eq!(harness.shared.claim("X", 3), Claim::Fetch);
        let links: Arc<[String]> = vec!["Y".to_string()].into();
        harness.shared.record_links("X", links);

        harness.crawl("A").await;

        assert_eq!(harness.parser.calls("X"), 0);
        assert_eq!(harness.parser.calls("Y"), 1);
        assert_eq!(harness.shared.word_counts().get("y"), Some(&1));
    }

    #[tokio::test]
    async fn test_failed_page_has_nothing_to_reexpand() {
        let parser = GraphParser::new()
            .page("A", &["B", "C"], &[("x", 1)])
            .page("B", &["C"], &[("x", 1)])
            .failing("C");
        let harness = Harness::new(parser, 3);
        harness.crawl("A").await;

        assert_eq!(harness.parser.calls("C"), 1);
        assert_eq!(harness.shared.word_counts().get("x"), Some(&2));
    }
}
