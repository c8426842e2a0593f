// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Features:
// - Recursive fork/join crawling: one task per URL, each waits for its children
// - Exactly-once visits, even when many tasks discover the same URL at once
// - Depth limit, cooperative deadline and ignored-URL patterns
// - Word counts merged into one shared total, no lost updates
//
// Submodules:
// - policy:      CrawlPolicy, the immutable rules of a run
// - state:       SharedCrawlState, the concurrent visited set and word totals
// - task:        CrawlTask, the recursive unit of work
// - coordinator: Coordinator, seeds the tasks and returns the result
//
// Only the coordinator types are public; tasks, state and policy are details
// of how a crawl runs.
// =============================================================================

mod coordinator;
mod policy;
mod state;
mod task;

// Fakes shared by the tests of several submodules
#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, Crawl, CrawlOptions};
