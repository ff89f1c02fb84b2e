//! [`Context`] is the handle a running reaction receives for reading the
//! current tag and recording the scheduling effects (`schedule`,
//! `schedule_shutdown`) it requests. The scheduler inspects the returned
//! `Context` after the reaction body returns and turns those effects into
//! queued events — the reaction body itself never touches the event queue.

use std::time::Duration;

use cadence_core::{ActionKey, Tag, Timestamp};

#[derive(Debug, Clone)]
pub struct Context {
    start_time: Timestamp,
    tag: Tag,
    scheduled_actions: Vec<(ActionKey, Tag)>,
    shutdown_tag: Option<Tag>,
    deadline_missed: bool,
}

impl Context {
    pub fn new(start_time: Timestamp, tag: Tag) -> Self {
        Self {
            start_time,
            tag,
            scheduled_actions: Vec::new(),
            shutdown_tag: None,
            deadline_missed: false,
        }
    }

    pub fn get_start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn get_tag(&self) -> Tag {
        self.tag
    }

    pub fn get_logical_time(&self) -> Timestamp {
        self.tag.to_logical_time(self.start_time)
    }

    pub fn get_elapsed_logical_time(&self) -> Duration {
        self.tag.offset()
    }

    pub fn get_microstep(&self) -> u32 {
        self.tag.microstep()
    }

    pub fn get_physical_time(&self) -> Timestamp {
        Timestamp::now()
    }

    pub fn get_elapsed_physical_time(&self) -> Duration {
        self.get_physical_time()
            .checked_duration_since(self.start_time)
            .unwrap_or_default()
    }

    /// Request shutdown at `tag + delay`. If called more than once in the same
    /// tag, the earliest requested shutdown tag wins.
    pub fn schedule_shutdown(&mut self, delay: Duration) {
        let tag = self.tag.delay(delay);
        self.shutdown_tag = Some(match self.shutdown_tag {
            Some(existing) => existing.min(tag),
            None => tag,
        });
    }

    pub(crate) fn schedule_at(&mut self, key: ActionKey, tag: Tag) {
        self.scheduled_actions.push((key, tag));
    }

    pub(crate) fn mark_deadline_missed(&mut self) {
        self.deadline_missed = true;
    }

    pub fn deadline_missed(&self) -> bool {
        self.deadline_missed
    }

    pub fn scheduled_actions(&self) -> &[(ActionKey, Tag)] {
        &self.scheduled_actions
    }

    pub fn requested_shutdown_tag(&self) -> Option<Tag> {
        self.shutdown_tag
    }
}
