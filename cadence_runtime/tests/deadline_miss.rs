//! A reaction with a deadline shorter than the lag between its tag's logical
//! time and the physical time it actually runs at has its body skipped, with
//! `Context::deadline_missed` set instead. If a `deadline_handler` is
//! registered via `Reaction::with_deadline_handler`, it runs in place of the
//! body rather than skipping it outright.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence_core::{ActionKey, PortKey, Tag, Timestamp};
use cadence_runtime::{
    BaseAction, BasePort, Chain, Context, EmptyState, IoCtx, Level, Reaction, ReactorState,
};
use slotmap::SlotMap;

#[test]
fn reaction_with_expired_deadline_skips_its_body() {
    let ran = Arc::new(AtomicBool::new(false));
    let ran_writer = Arc::clone(&ran);

    let mut reactors: SlotMap<cadence_core::ReactorKey, ()> = SlotMap::with_key();
    let reactor_key = reactors.insert(());

    let reaction = Reaction::new(
        "late".into(),
        reactor_key,
        vec![],
        vec![],
        vec![],
        Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, _io: &mut IoCtx| {
            ran_writer.store(true, Ordering::SeqCst);
        }),
        Level::from(0),
        Chain::single(0),
        Some(Duration::from_millis(10)),
    );

    // Backdate the logical start time by 60ms so that at `Tag::ZERO` the
    // physical-vs-logical lag already exceeds the 10ms deadline.
    let now: Duration = Timestamp::now().into();
    let start_time = Timestamp::from(now - Duration::from_millis(60));

    let ctx = Context::new(start_time, Tag::ZERO);
    let mut ports: SlotMap<PortKey, Box<dyn BasePort>> = SlotMap::with_key();
    let mut actions: SlotMap<ActionKey, Box<dyn BaseAction>> = SlotMap::with_key();
    let mut io = IoCtx::new(&mut ports, &mut actions, &[], &[], &[]);
    let mut state = EmptyState;

    let ctx = reaction.trigger(ctx, &mut state, &mut io);

    assert!(ctx.deadline_missed());
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn reaction_with_expired_deadline_runs_its_handler_instead_of_its_body() {
    let ran_body = Arc::new(AtomicBool::new(false));
    let ran_handler = Arc::new(AtomicBool::new(false));
    let ran_body_writer = Arc::clone(&ran_body);
    let ran_handler_writer = Arc::clone(&ran_handler);

    let mut reactors: SlotMap<cadence_core::ReactorKey, ()> = SlotMap::with_key();
    let reactor_key = reactors.insert(());

    let reaction = Reaction::new(
        "late".into(),
        reactor_key,
        vec![],
        vec![],
        vec![],
        Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, _io: &mut IoCtx| {
            ran_body_writer.store(true, Ordering::SeqCst);
        }),
        Level::from(0),
        Chain::single(0),
        Some(Duration::from_millis(10)),
    )
    .with_deadline_handler(Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, _io: &mut IoCtx| {
        ran_handler_writer.store(true, Ordering::SeqCst);
    }));

    let now: Duration = Timestamp::now().into();
    let start_time = Timestamp::from(now - Duration::from_millis(60));

    let ctx = Context::new(start_time, Tag::ZERO);
    let mut ports: SlotMap<PortKey, Box<dyn BasePort>> = SlotMap::with_key();
    let mut actions: SlotMap<ActionKey, Box<dyn BaseAction>> = SlotMap::with_key();
    let mut io = IoCtx::new(&mut ports, &mut actions, &[], &[], &[]);
    let mut state = EmptyState;

    let ctx = reaction.trigger(ctx, &mut state, &mut io);

    assert!(ctx.deadline_missed());
    assert!(!ran_body.load(Ordering::SeqCst));
    assert!(ran_handler.load(Ordering::SeqCst));
}

#[test]
fn reaction_within_deadline_runs_normally() {
    let ran = Arc::new(AtomicBool::new(false));
    let ran_writer = Arc::clone(&ran);

    let mut reactors: SlotMap<cadence_core::ReactorKey, ()> = SlotMap::with_key();
    let reactor_key = reactors.insert(());

    let reaction = Reaction::new(
        "on_time".into(),
        reactor_key,
        vec![],
        vec![],
        vec![],
        Box::new(move |_ctx: &mut Context, _s: &mut dyn ReactorState, _io: &mut IoCtx| {
            ran_writer.store(true, Ordering::SeqCst);
        }),
        Level::from(0),
        Chain::single(0),
        Some(Duration::from_secs(60)),
    );

    let start_time = Timestamp::now();
    let ctx = Context::new(start_time, Tag::ZERO);
    let mut ports: SlotMap<PortKey, Box<dyn BasePort>> = SlotMap::with_key();
    let mut actions: SlotMap<ActionKey, Box<dyn BaseAction>> = SlotMap::with_key();
    let mut io = IoCtx::new(&mut ports, &mut actions, &[], &[], &[]);
    let mut state = EmptyState;

    let ctx = reaction.trigger(ctx, &mut state, &mut io);

    assert!(!ctx.deadline_missed());
    assert!(ran.load(Ordering::SeqCst));
}
