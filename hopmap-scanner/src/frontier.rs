//! Bookkeeping structures for one traversal run.
//!
//! All three are created empty per run and owned by the crawler that runs
//! them; nothing here is shared or persisted across runs.

use std::collections::{BTreeMap, HashSet, VecDeque};
use url::Url;

/// A pending traversal step: a URL and its hop distance from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub level: usize,
}

/// FIFO queue of pending traversal steps.
///
/// Entries must be marked visited and recorded in the level index before
/// they are pushed, so a URL can never be scheduled twice.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Append-only record of every URL scheduled during the run. Unbounded by
/// design; it lives only as long as the run does.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    seen: HashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Marks a URL as visited. Idempotent; returns `true` only when this
    /// call was the first mark, so check-and-mark is a single step.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Maps hop distance to the URLs discovered at that distance, in discovery
/// order. A URL appears in at most one level, at most once; the crawler
/// guarantees that by consulting the visited registry before recording.
#[derive(Debug, Default)]
pub struct LevelIndex {
    levels: BTreeMap<usize, Vec<String>>,
}

impl LevelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, level: usize, url: &str) {
        self.levels.entry(level).or_default().push(url.to_string());
    }

    /// The ordered mapping of level to discovered URLs, ascending by level.
    pub fn snapshot(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.levels
    }

    pub fn into_levels(self) -> BTreeMap<usize, Vec<String>> {
        self.levels
    }

    pub fn total(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
