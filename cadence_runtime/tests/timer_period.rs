//! A periodic timer keeps firing at its period until a reaction requests
//! shutdown, even when the requested shutdown tag falls between two of the
//! timer's own firings.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence_core::Tag;
use cadence_runtime::{
    Action, Chain, Config, Context, EmptyState, GraphBuilder, IoCtx, Level, Reaction,
    ReactorState, Scheduler, SchedulingStrategy,
};

#[test]
fn timer_fires_five_times_before_requested_shutdown() {
    let mut builder = GraphBuilder::new();
    let reactor = builder.insert_reactor("r0", Box::new(EmptyState));

    let timer = builder.insert_action(|k| Action::<()>::new_timer("timer", k, Duration::ZERO, Duration::from_millis(50)).boxed());

    let count = Arc::new(AtomicU32::new(0));
    let count_writer = Arc::clone(&count);

    let on_tick = Reaction::new(
        "on_tick".into(),
        reactor,
        vec![],
        vec![],
        vec![],
        Box::new(move |ctx: &mut Context, _s: &mut dyn ReactorState, _io: &mut IoCtx| {
            count_writer.fetch_add(1, Ordering::SeqCst);
            if ctx.get_elapsed_logical_time() >= Duration::from_millis(200) {
                ctx.schedule_shutdown(Duration::ZERO);
            }
        }),
        Level::from(0),
        Chain::single(0),
        None,
    );
    let on_tick_key = builder.insert_reaction(on_tick, reactor, [], [], []);
    builder.insert_startup_action(timer, Tag::ZERO);
    builder.insert_action_trigger(timer, (Level::from(0), on_tick_key));

    let (env, graph) = builder.build();
    let scheduler = Scheduler::new(env, graph, Config::default());
    scheduler.run(SchedulingStrategy::Dynamic);

    assert_eq!(count.load(Ordering::SeqCst), 5);
}
