//! A value produced at startup crosses a logical action with a minimum delay
//! before reaching its sink, and the sink observes that delay in its tag.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cadence_core::Tag;
use cadence_runtime::{
    Action, Chain, Config, Context, EmptyState, GraphBuilder, IoCtx, Level, Port, Reaction,
    ReactorState, Scheduler, SchedulingStrategy,
};

#[derive(Debug, Default)]
struct DelayState {
    y_state: u32,
}
impl ReactorState for DelayState {}

#[test]
fn value_is_delayed_by_the_action_s_minimum_delay() {
    let mut builder = GraphBuilder::new();

    let source = builder.insert_reactor("source", Box::new(EmptyState));
    let delay = builder.insert_reactor("delay", Box::new(DelayState::default()));
    let sink = builder.insert_reactor("sink", Box::new(EmptyState));

    let startup = builder.insert_action(|k| Action::<()>::new_startup(k).boxed());
    let act = builder.insert_action(|k| Action::<()>::new("act", k, Some(Duration::from_millis(100)), true).boxed());
    let y = builder.insert_port(|k| Port::<u32>::new("y", k, 1).boxed());
    let out = builder.insert_port(|k| Port::<u32>::new("out", k, 0).boxed());

    let elapsed = Arc::new(Mutex::new(None));
    let elapsed_writer = Arc::clone(&elapsed);

    let source_reaction = Reaction::new(
        "source_startup".into(),
        source,
        vec![],
        vec![y],
        vec![],
        Box::new(|_ctx: &mut Context, _s: &mut dyn ReactorState, io: &mut IoCtx| {
            io.set_output(0, 1u32);
        }),
        Level::from(0),
        Chain::single(0),
        None,
    );
    let source_key = builder.insert_reaction(source_reaction, source, [], [y], []);
    builder.insert_startup_action(startup, Tag::ZERO);
    builder.insert_action_trigger(startup, (Level::from(0), source_key));

    let capture_reaction = Reaction::new(
        "capture_y".into(),
        delay,
        vec![y],
        vec![],
        vec![act],
        Box::new(|ctx: &mut Context, state: &mut dyn ReactorState, io: &mut IoCtx| {
            let state = state.downcast_mut::<DelayState>().unwrap();
            state.y_state = *io.input::<u32>(0).unwrap();
            io.action::<()>(0).schedule(ctx, (), Duration::ZERO);
        }),
        Level::from(1),
        Chain::single(0),
        None,
    );
    let capture_key = builder.insert_reaction(capture_reaction, delay, [y], [], [act]);
    builder.insert_port_trigger(y, (Level::from(1), capture_key));

    let emit_reaction = Reaction::new(
        "emit_act".into(),
        delay,
        vec![],
        vec![out],
        vec![],
        Box::new(move |_ctx: &mut Context, state: &mut dyn ReactorState, io: &mut IoCtx| {
            let state = state.downcast_ref::<DelayState>().unwrap();
            io.set_output(0, state.y_state);
        }),
        Level::from(2),
        Chain::single(0),
        None,
    );
    let emit_key = builder.insert_reaction(emit_reaction, delay, [], [out], []);
    builder.insert_action_trigger(act, (Level::from(2), emit_key));

    let sink_reaction = Reaction::new(
        "sink_in".into(),
        sink,
        vec![out],
        vec![],
        vec![],
        Box::new(move |ctx: &mut Context, _s: &mut dyn ReactorState, io: &mut IoCtx| {
            if io.input::<u32>(0).is_some() {
                *elapsed_writer.lock().unwrap() = Some(ctx.get_elapsed_logical_time());
            }
        }),
        Level::from(3),
        Chain::single(0),
        None,
    );
    let sink_key = builder.insert_reaction(sink_reaction, sink, [out], [], []);
    builder.insert_port_trigger(out, (Level::from(3), sink_key));

    let (env, graph) = builder.build();
    let scheduler = Scheduler::new(env, graph, Config::default());
    scheduler.run(SchedulingStrategy::Dynamic);

    assert_eq!(*elapsed.lock().unwrap(), Some(Duration::from_millis(100)));
}
