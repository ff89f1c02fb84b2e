//! Two reactor pairs with disjoint chain-ids at the same level are
//! independent: each consumer only ever observes its own producer's value,
//! regardless of which pair's reactions the queue happens to dispatch first.
//!
//! The dynamic scheduler dispatches a level's reactions on a single thread
//! (see `DESIGN.md`), so this does not measure wall-clock concurrency; it
//! checks the correctness property that makes concurrent dispatch safe to add
//! later: disjoint chains never share state and never need to be ordered
//! relative to each other.

use cadence_core::Tag;
use cadence_runtime::{
    Action, Chain, Config, Context, EmptyState, GraphBuilder, IoCtx, Level, Port, Reaction,
    ReactorState, Scheduler, SchedulingStrategy,
};

fn producer_consumer(
    builder: &mut GraphBuilder,
    chain: Chain,
    produced: i32,
    observed: std::sync::Arc<std::sync::atomic::AtomicI32>,
) -> cadence_core::ReactionKey {
    let producer = builder.insert_reactor("producer", Box::new(EmptyState));
    let consumer = builder.insert_reactor("consumer", Box::new(EmptyState));
    let mid = builder.insert_port(|k| Port::<i32>::new("mid", k, 1).boxed());

    let produce = Reaction::new(
        "produce".into(),
        producer,
        vec![],
        vec![mid],
        vec![],
        Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, io: &mut IoCtx| {
            io.set_output(0, produced);
        }),
        Level::from(0),
        chain,
        None,
    );
    let produce_key = builder.insert_reaction(produce, producer, [], [mid], []);

    let consume = Reaction::new(
        "consume".into(),
        consumer,
        vec![mid],
        vec![],
        vec![],
        Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, io: &mut IoCtx| {
            if let Some(&v) = io.input::<i32>(0) {
                observed.store(v, std::sync::atomic::Ordering::SeqCst);
            }
        }),
        Level::from(1),
        chain,
        None,
    );
    let consume_key = builder.insert_reaction(consume, consumer, [mid], [], []);
    builder.insert_port_trigger(mid, (Level::from(1), consume_key));
    let _ = consume_key;

    produce_key
}

#[test]
fn disjoint_chains_do_not_cross_talk() {
    let mut builder = GraphBuilder::new();

    let observed_a = std::sync::Arc::new(std::sync::atomic::AtomicI32::new(-1));
    let observed_b = std::sync::Arc::new(std::sync::atomic::AtomicI32::new(-1));

    let startup = builder.insert_action(|k| Action::<()>::new_startup(k).boxed());

    let produce_a = producer_consumer(&mut builder, Chain::single(0), 11, observed_a.clone());
    let produce_b = producer_consumer(&mut builder, Chain::single(1), 22, observed_b.clone());

    assert!(!Chain::single(0).overlaps(Chain::single(1)));

    builder.insert_startup_action(startup, Tag::ZERO);
    builder.insert_action_trigger(startup, (Level::from(0), produce_a));
    builder.insert_action_trigger(startup, (Level::from(0), produce_b));

    let (env, graph) = builder.build();
    let scheduler = Scheduler::new(env, graph, Config::default());
    scheduler.run(SchedulingStrategy::Dynamic);

    assert_eq!(observed_a.load(std::sync::atomic::Ordering::SeqCst), 11);
    assert_eq!(observed_b.load(std::sync::atomic::Ordering::SeqCst), 22);
}
