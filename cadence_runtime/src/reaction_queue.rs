//! The ready-set of reactions for the current tag, indexed by [`Level`].
//!
//! Reactions at level `N` may, while executing, trigger further reactions at
//! levels `M > N` (never at or below `N` — that would violate the topological
//! ordering the levels encode). [`ReactionQueueView::for_each_level`] exposes
//! exactly that shape: a read-only view of the current level plus a
//! split-borrowed mutable view of everything above it, so a reaction handler
//! can enqueue into a higher level while the queue is mid-traversal.
//!
//! Ordering within a level is level-only: a level's ready set is a
//! `HashSet<ReactionKey>`, so two reactions at the same level with different
//! deadlines run in whatever order the hash set yields, not shortest-deadline
//! first. `Reaction`'s deadline is known only to `Env`, which this module has
//! no handle on, so carrying it into `LevelReactionKey` would mean plumbing a
//! deadline value through every `extend_above` call site (`scheduler/mod.rs`,
//! `env/mod.rs`, `quasi_static.rs`). Since reactions at the same level are, by
//! construction, unordered by the dependency graph already (same-level means
//! no path between them), this only matters for wall-clock responsiveness
//! under a deadline, not for correctness of the precedence relation itself —
//! recorded as a known gap rather than silently dropped (see `DESIGN.md`).

use std::collections::HashSet;

use cadence_core::ReactionKey;

/// Topological depth of a reaction in the intra-tag dataflow DAG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Level(pub(crate) usize);

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<usize> for Level {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl Level {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::ops::Add<usize> for Level {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl std::ops::AddAssign<usize> for Level {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}

pub type LevelReactionKey = (Level, ReactionKey);

#[derive(Debug, Clone)]
pub struct ReactionQueueLimits {
    pub max_level: Level,
}

/// Per-tag bag of queued reactions, one set per level.
#[derive(Debug, Default)]
pub struct ReactionQueue {
    levels: Vec<HashSet<ReactionKey>>,
}

impl ReactionQueue {
    pub fn new(limits: &ReactionQueueLimits) -> Self {
        Self {
            levels: vec![HashSet::new(); limits.max_level.0 + 1],
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(HashSet::is_empty)
    }

    /// Insert a reaction at a level. Idempotent: inserting an already-queued
    /// reaction a second time has no effect, matching the "insert is a no-op
    /// if status == queued" rule.
    pub fn extend_above(&mut self, keys: impl IntoIterator<Item = LevelReactionKey>) {
        for (level, key) in keys {
            self.levels[level.0].insert(key);
        }
    }

    pub fn view(&mut self) -> ReactionQueueView<'_> {
        ReactionQueueView {
            levels: self.levels.as_mut_slice(),
            current_level: Level(0),
        }
    }

    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
    }
}

pub struct ReactionQueueView<'a> {
    levels: &'a mut [HashSet<ReactionKey>],
    current_level: Level,
}

impl<'a> ReactionQueueView<'a> {
    pub fn levels_remaining(&self) -> bool {
        self.levels[self.current_level.0..]
            .iter()
            .any(|level| !level.is_empty())
    }

    /// Visit each non-empty level in increasing order. The callback receives
    /// the reactions ready at that level and, unless this was the last level,
    /// a mutable handle onto every level above it.
    pub fn for_each_level<F>(mut self, mut f: F)
    where
        F: FnMut(
            Level,
            std::collections::hash_set::Iter<'_, ReactionKey>,
            Option<ReactionQueueViewMut<'_>>,
        ),
    {
        while self.current_level.0 < self.levels.len() {
            if self.levels[self.current_level.0].is_empty() {
                self.current_level += 1;
                continue;
            }

            let (upper, lower) = self.levels.split_at_mut(self.current_level.0 + 1);
            let remaining = (!lower.is_empty()).then(|| ReactionQueueViewMut {
                levels: lower,
                current_level: self.current_level + 1,
            });

            let first = &upper[self.current_level.0];
            f(self.current_level, first.iter(), remaining);

            self.current_level += 1;
        }
    }
}

pub struct ReactionQueueViewMut<'a> {
    levels: &'a mut [HashSet<ReactionKey>],
    current_level: Level,
}

impl<'a> ReactionQueueViewMut<'a> {
    pub fn extend_above(&mut self, keys: impl IntoIterator<Item = LevelReactionKey>) {
        for (level, key) in keys {
            if level >= self.current_level {
                let idx = level.0 - self.current_level.0;
                self.levels[idx].insert(key);
            }
        }
    }
}
