// src/crawl/state.rs
// =============================================================================
// SharedCrawlState: the only mutable data shared between crawl tasks.
//
// - visited:     every URL some task has claimed, with the shallowest depth
//                it has been reached at and (once fetched) its outbound links
// - word_counts: running total of word occurrences over all visited pages
//
// Both are DashMap-backed (a sharded concurrent map), and both are only ever
// touched through a few operations:
// - claim:        test-and-insert in ONE step, so exactly one racer fetches
// - record_links: remember a fetched page's links for later re-expansion
// - add_counts:   increment-or-initialise per word while holding that word's
//                 shard, so concurrent writers never lose an update
//
// Why remember depth and links?
// - Tasks run concurrently, so a URL can first be reached through a LONG path
//   and only later through a SHORTER one
// - If we only kept "seen / not seen", the page would be expanded at the deep
//   depth and the shorter path would be thrown away, so which pages are
//   reached would depend on scheduling
// - Keeping the best depth lets the shorter path re-expand the cached links
//   without fetching (or counting) the page a second time
//
// Callers never see a lock.
//
// Rust concepts used:
// - DashMap entry API: look up and modify a key under its shard lock
// - Arc<[String]>: a shared, immutable list of links that is cheap to clone
// =============================================================================

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

// What a task is allowed to do with the URL it tried to claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// First claim: fetch the page, merge its words, expand its links
    Fetch,
    /// Already fetched, but now reached by a shorter path: expand the cached
    /// links again from this depth (no fetch, no word merge)
    Reexpand(Arc<[String]>),
    /// Nothing to do: already claimed at the same or a shallower depth
    Skip,
}

// Per-URL bookkeeping
#[derive(Debug)]
struct Visit {
    // Shallowest depth this URL has been reached at so far
    depth: usize,
    // None while the fetch is still in flight
    links: Option<Arc<[String]>>,
}

#[derive(Debug, Default)]
pub struct SharedCrawlState {
    visited: DashMap<String, Visit>,
    word_counts: DashMap<String, usize>,
}

impl SharedCrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for a task reached at `depth`.
    ///
    /// Returns `Claim::Fetch` iff this call is the first to claim the URL.
    pub fn claim(&self, url: &str, depth: usize) -> Claim {
        // entry() holds the shard lock until the match arm finishes, so the
        // test and the insert/update happen as one atomic step
        match self.visited.entry(url.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(Visit { depth, links: None });
                Claim::Fetch
            }
            Entry::Occupied(mut occupied) => {
                let visit = occupied.get_mut();
                if depth >= visit.depth {
                    return Claim::Skip;
                }

                // A shorter path: remember it, so whoever expands the links
                // next uses this depth
                visit.depth = depth;
                match &visit.links {
                    Some(links) => Claim::Reexpand(links.clone()),
                    // The fetching task will pick up the new depth when it
                    // records the links
                    None => Claim::Skip,
                }
            }
        }
    }

    /// Stores the links of a fetched page and returns the shallowest depth the
    /// page has been reached at, which is the depth its links should be
    /// expanded from.
    pub fn record_links(&self, url: &str, links: Arc<[String]>) -> Option<usize> {
        self.visited.get_mut(url).map(|mut visit| {
            visit.links = Some(links);
            visit.depth
        })
    }

    /// Folds one page's word counts into the running total.
    pub fn add_counts(&self, counts: &HashMap<String, usize>) {
        for (word, count) in counts {
            // or_insert(0) initialises a new word, += adds to an existing one;
            // both happen while the word's shard is locked
            *self.word_counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Copies the current totals out of the concurrent map.
    pub fn word_counts(&self) -> HashMap<String, usize> {
        self.word_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a HashSet behind a Mutex?
//    - Every task would queue up on the same lock
//    - DashMap splits the map into shards, each with its own lock, so tasks
//      working on different URLs rarely wait for each other
//
// 2. Why must the claim be ONE operation?
//    - "if !contains(url) { insert(url) }" is two steps
//    - Two tasks can both pass the contains() check before either inserts,
//      and then both fetch the same page
//    - entry() does the check and the insert under a single lock
//
// 3. Why can't a depth-aware claim fetch twice?
//    - Only the Vacant arm returns Claim::Fetch, and a key is vacant once
//    - Later claims can only lower the stored depth, never reset it
// -----------------------------------------------------------------------------
