//! Cadence is a deterministic, discrete-event reactive execution engine:
//! reactors communicate over typed ports and actions, and a scheduler runs
//! their reactions in logical-time order.
//!
//! ## Example
//!
//! Build a tiny graph with a startup reaction and run it to completion:
//!
//! ```rust
//! use cadence::runtime::{Action, Config, Context, EmptyState, GraphBuilder, IoCtx, Level, Chain, Port, Reaction, ReactorState, Scheduler, SchedulingStrategy};
//! use cadence_core::Tag;
//!
//! let mut builder = GraphBuilder::new();
//! let reactor = builder.insert_reactor("hello", Box::new(EmptyState));
//! let startup = builder.insert_action(|k| Action::<()>::new_startup(k).boxed());
//! let out = builder.insert_port(|k| Port::<i32>::new("out", k, 0).boxed());
//!
//! let reaction = Reaction::new(
//!     "greet".into(),
//!     reactor,
//!     vec![],
//!     vec![out],
//!     vec![],
//!     Box::new(|_ctx: &mut Context, _s: &mut dyn ReactorState, io: &mut IoCtx| {
//!         io.set_output(0, 1);
//!     }),
//!     Level::from(0),
//!     Chain::single(0),
//!     None,
//! );
//! let reaction_key = builder.insert_reaction(reaction, reactor, [], [out], []);
//! builder.insert_startup_action(startup, Tag::ZERO);
//! builder.insert_action_trigger(startup, (Level::from(0), reaction_key));
//!
//! let (env, graph) = builder.build();
//! let scheduler = Scheduler::new(env, graph, Config::default());
//! scheduler.run(SchedulingStrategy::Dynamic);
//! ```

pub use cadence_core as core;
pub use cadence_runtime as runtime;
