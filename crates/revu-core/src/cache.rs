//! Memoized per-commit diffs and their saved view positions

use crate::git::CommitId;
use crate::position::ViewPosition;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// One line of raw diff text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    line: String,
}

impl DiffLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    pub fn text(&self) -> &str {
        &self.line
    }
}

/// The lines of one commit's diff plus the position to restore it at
#[derive(Debug, Clone, Default)]
pub struct Diff {
    lines: Vec<DiffLine>,
    saved_position: ViewPosition,
}

impl Diff {
    /// Split raw diff output into lines.
    ///
    /// Blank lines are kept; a trailing newline does not add an empty line and
    /// `\r\n` endings lose their `\r`.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(DiffLine::new).collect(),
            saved_position: ViewPosition::default(),
        }
    }

    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&DiffLine> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn saved_position(&self) -> ViewPosition {
        self.saved_position
    }

    pub fn save_position(&mut self, position: ViewPosition) {
        self.saved_position = position;
    }
}

/// How many diffs the cache keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every diff for the lifetime of the cache
    #[default]
    Unbounded,
    /// Keep at most this many diffs, dropping the least recently used.
    /// Positions of dropped diffs are remembered; that small map is never pruned.
    Bounded(NonZeroUsize),
}

impl CachePolicy {
    /// `0` means unbounded
    pub fn from_capacity(capacity: usize) -> Self {
        NonZeroUsize::new(capacity)
            .map(CachePolicy::Bounded)
            .unwrap_or(CachePolicy::Unbounded)
    }
}

/// Commit → diff map that computes each entry on first request.
///
/// Failed computations are never stored, so asking again retries.
#[derive(Debug, Default)]
pub struct DiffCache {
    diffs: HashMap<CommitId, Diff>,
    recency: Option<LruCache<CommitId, ()>>,
    evicted_positions: HashMap<CommitId, ViewPosition>,
}

impl DiffCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        let recency = match policy {
            CachePolicy::Unbounded => None,
            CachePolicy::Bounded(capacity) => Some(LruCache::new(capacity)),
        };
        Self {
            diffs: HashMap::new(),
            recency,
            evicted_positions: HashMap::new(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        match &self.recency {
            None => CachePolicy::Unbounded,
            Some(recency) => CachePolicy::Bounded(recency.cap()),
        }
    }

    /// Return the diff for `commit`, calling `compute` only on a miss
    pub fn get_or_create<E, F>(&mut self, commit: &CommitId, compute: F) -> Result<&Diff, E>
    where
        F: FnOnce(&CommitId) -> Result<String, E>,
    {
        if self.diffs.contains_key(commit) {
            log::debug!("Diff cache hit for {}", commit.short());
        } else {
            log::debug!("Diff cache miss for {}", commit.short());
            let text = compute(commit)?;
            let mut diff = Diff::from_text(&text);
            if let Some(position) = self.evicted_positions.remove(commit) {
                diff.save_position(position);
            }
            self.make_room();
            self.diffs.insert(commit.clone(), diff);
        }

        if let Some(recency) = self.recency.as_mut() {
            recency.put(commit.clone(), ());
        }

        Ok(self.diffs.entry(commit.clone()).or_default())
    }

    pub fn get(&self, commit: &CommitId) -> Option<&Diff> {
        self.diffs.get(commit)
    }

    pub fn contains(&self, commit: &CommitId) -> bool {
        self.diffs.contains_key(commit)
    }

    /// Store the position a commit was left at
    pub fn save_position(&mut self, commit: &CommitId, position: ViewPosition) {
        if let Some(diff) = self.diffs.get_mut(commit) {
            diff.save_position(position);
        } else if self.evicted_positions.contains_key(commit) {
            self.evicted_positions.insert(commit.clone(), position);
        }
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    fn make_room(&mut self) {
        let Some(recency) = self.recency.as_mut() else {
            return;
        };
        while self.diffs.len() >= recency.cap().get() {
            let Some((commit, ())) = recency.pop_lru() else {
                break;
            };
            if let Some(diff) = self.diffs.remove(&commit) {
                log::debug!("Evicting diff for {}", commit.short());
                self.evicted_positions
                    .insert(commit, diff.saved_position());
            }
        }
    }
}
