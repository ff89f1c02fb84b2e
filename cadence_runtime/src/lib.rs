//! The execution half of cadence: ports, actions, reactions, and the
//! schedulers that run them in logical-time order.
//!
//! The graph-assembly API ([`GraphBuilder`]) produces an [`Env`] plus a
//! [`ReactionGraph`]; a [`Scheduler`] owns both and drives them forward tag
//! by tag, either computing the ready set dynamically or replaying a
//! schedule compiled ahead of time (see [`scheduler::quasi_static`]).
#![deny(clippy::all)]

mod action;
mod chain;
mod config;
mod context;
mod env;
mod error;
mod event;
mod io;
pub mod keepalive;
mod port;
mod reaction;
mod reaction_queue;
mod reactor;
mod scheduler;
mod token;
mod worker;

pub use action::*;
pub use chain::Chain;
pub use config::{Config, SchedulingStrategy};
pub use context::Context;
pub use env::{max_level, Env, GraphBuilder, ReactionGraph};
pub use error::RuntimeError;
pub use event::{PhysicalEvent, ScheduledEvent};
pub use io::IoCtx;
pub use port::*;
pub use reaction::{Reaction, ReactionFn, ReactionStatus};
pub use reaction_queue::{Level, LevelReactionKey, ReactionQueue, ReactionQueueLimits};
pub use reactor::{EmptyState, Reactor, ReactorState};
pub use scheduler::{quasi_static, Scheduler};
pub use token::Token;
pub use worker::run_scoped;

pub use cadence_core::{ActionKey, PortKey, ReactionKey, ReactorKey, Tag, Timestamp};

/// Marker trait for any value a [`Port`] or [`Action`] can carry. Blanket
/// implemented the same way the graph-assembly crate marks its own data
/// types: no registration, no derive, just the bounds the scheduler needs to
/// store a value behind a type-erased pointer and hand it back safely.
pub trait ReactorData: std::fmt::Debug + downcast_rs::Downcast + Send + Sync + 'static {}
impl<T> ReactorData for T where T: std::fmt::Debug + Send + Sync + 'static {}
downcast_rs::impl_downcast!(ReactorData);
