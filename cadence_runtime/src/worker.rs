//! A fixed-size OS-thread pool used by the quasi-static scheduler to run each
//! worker's instruction stream concurrently.
//!
//! The dynamic scheduler does not use this pool: dispatching reactions within
//! a level across threads would need the same disjoint-borrow machinery the
//! teacher's unsafe `disjoint`/`split` modules provided, which this runtime
//! deliberately does not carry forward (see `DESIGN.md`). The quasi-static
//! strategy sidesteps that problem by serializing all arena access behind a
//! single `Mutex` (see [`crate::scheduler::quasi_static`]) and using threads
//! only for the `Wait`/`Notify` synchronization, not for concurrent mutation.

/// Run `jobs`, one per scoped OS thread, waiting for all of them to finish.
///
/// This is a thin wrapper over `std::thread::scope` rather than a persistent
/// pool: a quasi-static schedule's worker count is fixed for the lifetime of
/// one run, so there is nothing to reuse between runs.
pub fn run_scoped<'env, F>(jobs: Vec<F>)
where
    F: FnOnce() + Send + 'env,
{
    std::thread::scope(|scope| {
        for job in jobs {
            scope.spawn(job);
        }
    });
}
