//! A [`Reaction`] is a function triggered by one or more ports/actions,
//! carrying the static precedence metadata (`level`, `chain`, `deadline`) the
//! schedulers use to decide dispatch order.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use cadence_core::{ActionKey, PortKey, ReactorKey};

use crate::{Chain, Context, IoCtx, Level, ReactorState};

pub trait ReactionFn: Fn(&mut Context, &mut dyn ReactorState, &mut IoCtx) + Send + Sync {}

impl<F> ReactionFn for F where F: Fn(&mut Context, &mut dyn ReactorState, &mut IoCtx) + Send + Sync {}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionStatus {
    Inactive = 0,
    Queued = 1,
    Running = 2,
}

/// An atomic, CAS-guarded status field. Transitions are monotonic within a tag:
/// `Inactive -> Queued -> Running -> Inactive`. An unexpected transition is a
/// scheduler invariant violation (§7) and panics rather than silently
/// continuing with a corrupted tag.
#[derive(Debug)]
pub struct AtomicReactionStatus(AtomicU8);

impl Default for AtomicReactionStatus {
    fn default() -> Self {
        Self(AtomicU8::new(ReactionStatus::Inactive as u8))
    }
}

impl AtomicReactionStatus {
    pub fn load(&self) -> ReactionStatus {
        match self.0.load(Ordering::Acquire) {
            0 => ReactionStatus::Inactive,
            1 => ReactionStatus::Queued,
            2 => ReactionStatus::Running,
            other => unreachable!("invalid reaction status byte: {other}"),
        }
    }

    /// Attempt `Inactive -> Queued`. Returns `true` if this call performed the
    /// transition (the caller should enqueue); `false` if it was already queued.
    pub fn try_queue(&self) -> bool {
        self.0
            .compare_exchange(
                ReactionStatus::Inactive as u8,
                ReactionStatus::Queued as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// `Queued -> Running`. Panics if the reaction was not queued.
    pub fn start_running(&self) {
        self.0
            .compare_exchange(
                ReactionStatus::Queued as u8,
                ReactionStatus::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .unwrap_or_else(|found| {
                panic!("invariant violation: expected Queued, found {found}")
            });
    }

    /// `Running -> Inactive`. Panics if the reaction was not running.
    pub fn finish(&self) {
        self.0
            .compare_exchange(
                ReactionStatus::Running as u8,
                ReactionStatus::Inactive as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .unwrap_or_else(|found| {
                panic!("invariant violation: expected Running, found {found}")
            });
    }

    pub fn reset(&self) {
        self.0.store(ReactionStatus::Inactive as u8, Ordering::Release);
    }
}

pub struct Reaction {
    name: String,
    reactor_key: ReactorKey,
    input_ports: Vec<PortKey>,
    output_ports: Vec<PortKey>,
    actions: Vec<ActionKey>,
    body: Box<dyn ReactionFn>,
    level: Level,
    chain: Chain,
    deadline: Option<Duration>,
    deadline_handler: Option<Box<dyn ReactionFn>>,
    status: AtomicReactionStatus,
}

impl std::fmt::Debug for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaction")
            .field("name", &self.name)
            .field("reactor_key", &self.reactor_key)
            .field("level", &self.level)
            .field("deadline", &self.deadline)
            .field("status", &self.status.load())
            .finish()
    }
}

impl Reaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        reactor_key: ReactorKey,
        input_ports: Vec<PortKey>,
        output_ports: Vec<PortKey>,
        actions: Vec<ActionKey>,
        body: Box<dyn ReactionFn>,
        level: Level,
        chain: Chain,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            name,
            reactor_key,
            input_ports,
            output_ports,
            actions,
            body,
            level,
            chain,
            deadline,
            deadline_handler: None,
            status: AtomicReactionStatus::default(),
        }
    }

    /// Attach a handler run in place of the body on a deadline miss, instead
    /// of just skipping it. Mirrors `Config`'s `with_*` builder style.
    pub fn with_deadline_handler(mut self, handler: Box<dyn ReactionFn>) -> Self {
        self.deadline_handler = Some(handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reactor_key(&self) -> ReactorKey {
        self.reactor_key
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn status(&self) -> &AtomicReactionStatus {
        &self.status
    }

    pub fn iter_input_ports(&self) -> std::slice::Iter<'_, PortKey> {
        self.input_ports.iter()
    }

    pub fn iter_output_ports(&self) -> std::slice::Iter<'_, PortKey> {
        self.output_ports.iter()
    }

    pub fn iter_actions(&self) -> std::slice::Iter<'_, ActionKey> {
        self.actions.iter()
    }

    /// Run the reaction body against its resolved ports/actions, returning the
    /// `Context` the body populated with any `schedule`/`schedule_shutdown` calls.
    /// On a deadline miss, runs `deadline_handler` instead of the body if one
    /// is registered; otherwise the body is skipped entirely.
    pub fn trigger(&self, mut ctx: Context, state: &mut dyn ReactorState, io: &mut IoCtx) -> Context {
        if let Some(deadline) = self.deadline {
            let lag = ctx
                .get_physical_time()
                .checked_duration_since(ctx.get_logical_time())
                .unwrap_or_default();
            if lag > deadline {
                tracing::warn!(reaction = %self.name, ?lag, ?deadline, "deadline miss");
                ctx.mark_deadline_missed();
                if let Some(handler) = &self.deadline_handler {
                    handler(&mut ctx, state, io);
                }
                return ctx;
            }
        }

        (self.body)(&mut ctx, state, io);
        ctx
    }
}
