//! The quasi-static scheduler replays a schedule compiled ahead of time from
//! the static dependency graph instead of computing a ready set per tag.
//!
//! This is a direct structural port of Lingua Franca's `scheduler_QS.c`:
//! each worker owns a fixed instruction stream of `Execute`/`Wait`/`Notify`/
//! `Stop` opcodes, and workers synchronize purely through counting
//! semaphores — there is no shared ready-set and no per-tag bookkeeping. It
//! only applies to a graph with no physical actions and no runtime topology
//! changes, since the whole trace has to be known ahead of time.
//!
//! Faithfully to the original, `trigger_reaction` (waking a reaction when its
//! upstream fires) is a no-op here: the static schedule already encodes every
//! path a reaction can become ready through, so there is nothing left for a
//! runtime trigger to do.

use std::sync::{Arc, Condvar, Mutex};

use cadence_core::{ReactionKey, Tag};

use super::Scheduler;
use crate::reaction::ReactionStatus;
use crate::worker;

/// One worker's fixed instruction stream.
#[derive(Debug, Clone)]
pub enum Instruction {
    /// Run `reaction` at `tag`, unless its status is not `Queued` (another
    /// worker already claimed it, or it was never triggered this round).
    Execute { reaction: ReactionKey, tag: Tag },
    /// Block until semaphore `index` is non-zero, then decrement it.
    Wait { semaphore: usize },
    /// Increment semaphore `index`, waking one waiter.
    Notify { semaphore: usize },
    /// This worker's stream is exhausted.
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub workers: Vec<Vec<Instruction>>,
    pub num_semaphores: usize,
}

impl Schedule {
    pub fn new(workers: Vec<Vec<Instruction>>, num_semaphores: usize) -> Self {
        Self {
            workers,
            num_semaphores,
        }
    }
}

struct Semaphore {
    count: Mutex<u64>,
    condvar: Condvar,
}

impl Semaphore {
    fn new() -> Self {
        Self {
            count: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock().unwrap();
        while *count == 0 {
            count = self.condvar.wait(count).unwrap();
        }
        *count -= 1;
    }

    fn notify(&self) {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        self.condvar.notify_one();
    }
}

/// Mark a reaction queued so the next `Execute` instruction targeting it
/// actually runs. The C original marks every statically-known-triggerable
/// reaction queued at schedule-compile time for a fixed number of rounds;
/// here we queue once per call, mirroring a single quasi-static round.
pub fn arm(scheduler: &mut Scheduler, reaction: ReactionKey) {
    scheduler.env.reactions[reaction].status().try_queue();
}

/// Execute `schedule` to completion, one OS thread per worker stream.
///
/// `scheduler` must not have any reactions queued from a dynamic run, or this
/// round will see stale `Queued` status and run them twice.
pub fn run(scheduler: &mut Scheduler, schedule: &Schedule) {
    let semaphores: Vec<Semaphore> = (0..schedule.num_semaphores).map(|_| Semaphore::new()).collect();
    let scheduler = Arc::new(Mutex::new(scheduler));
    let semaphores = Arc::new(semaphores);

    let jobs: Vec<_> = schedule
        .workers
        .iter()
        .map(|stream| {
            let scheduler = Arc::clone(&scheduler);
            let semaphores = Arc::clone(&semaphores);
            move || run_stream(stream, &scheduler, &semaphores)
        })
        .collect();
    worker::run_scoped(jobs);
}

fn run_stream(stream: &[Instruction], scheduler: &Arc<Mutex<&mut Scheduler>>, semaphores: &[Semaphore]) {
    for instr in stream {
        match instr {
            Instruction::Execute { reaction, tag } => {
                let mut guard = scheduler.lock().unwrap();
                if guard.env.reactions[*reaction].status().load() != ReactionStatus::Queued {
                    continue;
                }
                guard.env.reactions[*reaction].status().start_running();
                guard.run_one(*reaction, *tag);
                guard.env.reactions[*reaction].status().finish();
            }
            Instruction::Wait { semaphore } => semaphores[*semaphore].wait(),
            Instruction::Notify { semaphore } => semaphores[*semaphore].notify(),
            Instruction::Stop => break,
        }
    }
}

/// Done-with-reaction is a simple status reset, matching the original's bare
/// compare-and-swap from `queued` back to `inactive` with no further
/// bookkeeping — the static schedule itself decides what runs next.
pub fn done_with_reaction(scheduler: &mut Scheduler, reaction: ReactionKey) {
    scheduler.env.reactions[reaction].status().reset();
}

/// No-op: see the module docs. Kept as a named function rather than omitted
/// entirely so a caller porting a trace from the original scheduler has an
/// obvious place to land.
pub fn trigger_reaction(_scheduler: &Scheduler, _reaction: ReactionKey) {}
