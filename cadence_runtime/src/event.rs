//! Events sitting in the scheduler's priority queues, waiting for their tag to
//! become current.

use cadence_core::{ActionKey, Tag};

use crate::reaction_queue::LevelReactionKey;

/// A tag due to fire, carrying the reactions it should enqueue once the
/// scheduler advances to it.
#[derive(Debug, Clone, Default)]
pub struct ScheduledEvent {
    pub(crate) tag: Tag,
    pub(crate) reactions: Vec<LevelReactionKey>,
    /// Whether the scheduler should terminate after processing this event.
    pub(crate) terminal: bool,
}

impl std::fmt::Display for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L[tag={:?},terminal={}]", self.tag, self.terminal)
    }
}

impl Eq for ScheduledEvent {}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.terminal == other.terminal
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; reverse so the earliest tag pops first.
        // Among equal tags, a terminal (shutdown) event sorts last.
        self.tag
            .cmp(&other.tag)
            .then(self.terminal.cmp(&other.terminal))
            .reverse()
    }
}

impl ScheduledEvent {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn reactions(&self) -> &[LevelReactionKey] {
        &self.reactions
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// A physical-time event admitted from outside the deterministic core (e.g. a
/// sensor callback scheduling a physical action).
#[derive(Debug, Clone)]
pub struct PhysicalEvent {
    pub(crate) tag: Tag,
    pub(crate) key: ActionKey,
    pub(crate) terminal: bool,
}

impl std::fmt::Display for PhysicalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P[tag={:?},terminal={}]", self.tag, self.terminal)
    }
}

impl PhysicalEvent {
    pub(crate) fn trigger(key: ActionKey, tag: Tag) -> Self {
        Self {
            tag,
            key,
            terminal: false,
        }
    }

    pub(crate) fn shutdown(tag: Tag) -> Self {
        Self {
            tag,
            key: ActionKey::default(),
            terminal: true,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn key(&self) -> ActionKey {
        self.key
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}
