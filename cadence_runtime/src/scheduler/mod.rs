//! The scheduler drives the reaction graph forward in tag order. The dynamic
//! strategy (this module) computes each tag's ready set at run time; the
//! [`quasi_static`] strategy replays a schedule compiled ahead of time.

pub mod quasi_static;

use std::collections::BTreeMap;

use crossbeam_channel::RecvTimeoutError;

use cadence_core::{ActionKey, Tag, Timestamp};

use crate::config::{Config, SchedulingStrategy};
use crate::env::{Env, ReactionGraph};
use crate::event::PhysicalEvent;
use crate::reaction_queue::{Level, LevelReactionKey, ReactionQueue, ReactionQueueLimits};
use crate::{keepalive, Context};

/// A pending tag in the event queue: the reactions it should wake and whether
/// it is a requested shutdown tag. Events sharing a tag are merged on insert,
/// so a single `BTreeMap` entry always holds the full ready set for that tag.
#[derive(Debug, Default)]
struct PendingEvent {
    reactions: Vec<LevelReactionKey>,
    terminal: bool,
}

pub struct Scheduler {
    env: Env,
    graph: ReactionGraph,
    event_queue: BTreeMap<Tag, PendingEvent>,
    physical_tx: crossbeam_channel::Sender<PhysicalEvent>,
    physical_rx: crossbeam_channel::Receiver<PhysicalEvent>,
    start_time: Timestamp,
    shutdown_tag: Option<Tag>,
    config: Config,
    shutdown_tx: keepalive::Sender,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("start_time", &self.start_time)
            .field("shutdown_tag", &self.shutdown_tag)
            .field("pending_tags", &self.event_queue.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new(env: Env, graph: ReactionGraph, config: Config) -> Self {
        let (physical_tx, physical_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, _shutdown_rx) = keepalive::channel();
        Self {
            env,
            graph,
            event_queue: BTreeMap::new(),
            physical_tx,
            physical_rx,
            start_time: Timestamp::now(),
            shutdown_tag: None,
            config,
            shutdown_tx,
        }
    }

    /// A sender physical actions can use to admit events into the scheduler
    /// from outside the deterministic core (e.g. an I/O callback thread).
    pub fn physical_event_sender(&self) -> crossbeam_channel::Sender<PhysicalEvent> {
        self.physical_tx.clone()
    }

    /// A handle threads can poll to learn when the scheduler has shut down.
    pub fn shutdown_receiver(&self) -> keepalive::Receiver {
        self.shutdown_tx.new_receiver()
    }

    fn merge_event(&mut self, tag: Tag, reactions: impl IntoIterator<Item = LevelReactionKey>, terminal: bool) {
        let entry = self.event_queue.entry(tag).or_default();
        entry.reactions.extend(reactions);
        entry.terminal |= terminal;
    }

    /// Seed the event queue with every startup action's initial firing.
    pub(crate) fn initialize_timers(&mut self) {
        let startup = self.graph.startup_actions.clone();
        for (action_key, tag) in startup {
            let reactions = self
                .graph
                .action_triggers
                .get(action_key)
                .cloned()
                .unwrap_or_default();
            self.merge_event(tag, reactions, false);
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn cleanup(&mut self, current_tag: Tag) {
        for port in self.env.ports.values_mut() {
            port.cleanup();
        }

        // Timers reschedule themselves for their next period.
        let reschedules: Vec<(ActionKey, Tag)> = self
            .env
            .actions
            .iter()
            .filter_map(|(key, action)| action.reschedule_if_periodic(current_tag).map(|tag| (key, tag)))
            .collect();
        for (key, tag) in reschedules {
            let reactions = self.graph.action_triggers.get(key).cloned().unwrap_or_default();
            self.merge_event(tag, reactions, false);
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn shutdown(&mut self, shutdown_tag: Tag) {
        tracing::info!(tag = ?shutdown_tag, "shutting down");
        let reactions: Vec<LevelReactionKey> = self.graph.shutdown_reactions().collect();
        self.process_tag(shutdown_tag, reactions);

        if !self.event_queue.is_empty() {
            tracing::warn!(
                pending = self.event_queue.len(),
                "unprocessed future events remain on the event queue at shutdown"
            );
        }

        tracing::info!(elapsed = ?shutdown_tag.offset(), "elapsed logical time");
        let physical_elapsed = Timestamp::now().checked_duration_since(self.start_time);
        tracing::info!(?physical_elapsed, "elapsed physical time");
        self.shutdown_tx.shutdown();
    }

    /// Run every ready reaction for `tag`, in increasing level order. A
    /// reaction at level `N` may enqueue further reactions at levels `M > N`
    /// for the SAME tag by setting an output port; actions it schedules
    /// always land at a future tag and go on `event_queue` instead.
    #[tracing::instrument(skip(self, ready), fields(tag = ?tag, n = ready.len()))]
    pub fn process_tag(&mut self, tag: Tag, ready: Vec<LevelReactionKey>) {
        let limits = ReactionQueueLimits {
            max_level: crate::env::max_level(&self.env),
        };
        let mut queue = ReactionQueue::new(&limits);
        queue.extend_above(ready);

        let mut scheduled_actions: Vec<(ActionKey, Tag)> = Vec::new();
        let mut shutdown_request: Option<Tag> = None;

        queue.view().for_each_level(|level, reactions, remaining| {
            let keys: Vec<_> = reactions.copied().collect();
            tracing::trace!(?level, n = keys.len(), "dispatching level");

            let mut remaining = remaining;
            for reaction_key in keys {
                let ctx = self.run_one(reaction_key, tag);
                scheduled_actions.extend(ctx.scheduled_actions().iter().copied());
                if let Some(t) = ctx.requested_shutdown_tag() {
                    shutdown_request = Some(shutdown_request.map_or(t, |s: Tag| s.min(t)));
                }

                let reactor_key = self.graph.reaction_reactors[reaction_key];
                let _ = reactor_key;
                if let Some(effect_ports) = self.graph.reaction_effect_ports.get(reaction_key) {
                    for &port_key in effect_ports {
                        if self.env.ports[port_key].is_set() {
                            if let Some(triggers) = self.graph.port_triggers.get(port_key) {
                                if let Some(remaining) = remaining.as_mut() {
                                    remaining.extend_above(triggers.iter().copied());
                                }
                            }
                        }
                    }
                }
            }
        });

        for (action_key, scheduled_tag) in scheduled_actions {
            let reactions = self
                .graph
                .action_triggers
                .get(action_key)
                .cloned()
                .unwrap_or_default();
            self.merge_event(scheduled_tag, reactions, false);
        }

        if let Some(t) = shutdown_request {
            let t = self.shutdown_tag.map_or(t, |s| s.min(t));
            self.shutdown_tag = Some(t);
            // A requested shutdown tag may have no reactions of its own (no
            // action/port triggers it); merge a terminal marker event so the
            // event loop still stops there instead of running past it.
            self.merge_event(t, std::iter::empty(), true);
        }

        self.cleanup(tag);
    }

    /// Execute a single reaction, resolving its ports/actions from `self.env`.
    fn run_one(&mut self, reaction_key: cadence_core::ReactionKey, tag: Tag) -> Context {
        let input_keys = &self.graph.reaction_use_ports[reaction_key];
        let output_keys = &self.graph.reaction_effect_ports[reaction_key];
        let action_keys = &self.graph.reaction_actions[reaction_key];
        let reactor_key = self.graph.reaction_reactors[reaction_key];

        let ctx = Context::new(self.start_time, tag);

        let reaction = &self.env.reactions[reaction_key];
        let reactor = &mut self.env.reactors[reactor_key];
        let mut io = crate::IoCtx::new(
            &mut self.env.ports,
            &mut self.env.actions,
            input_keys,
            output_keys,
            action_keys,
        );

        reaction.trigger(ctx, reactor.state_mut(), &mut io)
    }

    #[tracing::instrument(skip(self))]
    pub fn event_loop(&mut self) {
        self.start_time = Timestamp::now();
        self.initialize_timers();
        self.process_tag(Tag::ZERO, Vec::new());

        loop {
            let pending_events: Vec<_> = self.physical_rx.try_iter().collect();
            for event in pending_events {
                let reactions = if event.is_terminal() {
                    vec![]
                } else {
                    self.graph
                        .action_triggers
                        .get(event.key())
                        .cloned()
                        .unwrap_or_default()
                };
                self.merge_event(event.tag(), reactions, event.is_terminal());
            }

            let Some((&tag, _)) = self.event_queue.iter().next() else {
                if let Some(event) = self.wait_for_physical_event() {
                    let reactions = self
                        .graph
                        .action_triggers
                        .get(event.key())
                        .cloned()
                        .unwrap_or_default();
                    self.merge_event(event.tag(), reactions, event.is_terminal());
                    continue;
                }
                tracing::trace!("no more events; terminating");
                break;
            };

            if !self.config.fast_forward {
                let target = tag.to_logical_time(self.start_time);
                self.synchronize_wall_clock(target);
            }

            let pending = self.event_queue.remove(&tag).expect("tag observed above");

            if self.shutdown_tag == Some(tag) || pending.terminal {
                self.shutdown_tag = Some(tag);
                self.process_tag(tag, pending.reactions);
                break;
            }

            self.process_tag(tag, pending.reactions);
        }

        let shutdown_tag = self.shutdown_tag.unwrap_or_else(|| Tag::now(self.start_time));
        self.shutdown(shutdown_tag);
    }

    fn synchronize_wall_clock(&self, target: Timestamp) {
        let now = Timestamp::now();
        if let Some(advance) = target.checked_duration_since(now) {
            tracing::trace!(?advance, "sleeping until next tag's wall-clock time");
            match self.physical_rx.recv_timeout(advance) {
                Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => std::thread::sleep(advance),
            }
        }
    }

    fn wait_for_physical_event(&self) -> Option<PhysicalEvent> {
        if self.config.keep_alive {
            self.physical_rx.recv().ok()
        } else {
            None
        }
    }

    pub fn run(mut self, strategy: SchedulingStrategy) {
        match strategy {
            SchedulingStrategy::Dynamic => self.event_loop(),
            SchedulingStrategy::QuasiStatic(schedule) => {
                quasi_static::run(&mut self, &schedule);
            }
        }
    }

    pub(crate) fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    pub(crate) fn graph(&self) -> &ReactionGraph {
        &self.graph
    }

    pub(crate) fn start_time(&self) -> Timestamp {
        self.start_time
    }
}
