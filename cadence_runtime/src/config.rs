//! Scheduler configuration and the choice between the two execution strategies.

/// How the scheduler dispatches ready reactions to worker threads.
#[derive(Debug, Clone, Default)]
pub enum SchedulingStrategy {
    /// Compute the ready set for each tag at run time and dispatch level by
    /// level. Handles arbitrary dynamic scheduling (physical actions, runtime
    /// port connections) at the cost of per-tag bookkeeping.
    #[default]
    Dynamic,
    /// Execute a schedule compiled ahead of time from the static dependency
    /// graph: one fixed instruction stream per worker thread, synchronized by
    /// counting semaphores rather than a shared ready-set. Only valid when the
    /// graph has no physical actions and no runtime topology changes.
    QuasiStatic(crate::scheduler::quasi_static::Schedule),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Skip wall-clock synchronization and run as fast as possible.
    pub fast_forward: bool,
    /// Keep the scheduler alive waiting for physical/asynchronous events even
    /// after the logical event queue drains.
    pub keep_alive: bool,
    /// Number of worker threads in the reaction-dispatch pool.
    pub worker_count: usize,
    pub strategy: SchedulingStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fast_forward: true,
            keep_alive: false,
            worker_count: 1,
            strategy: SchedulingStrategy::default(),
        }
    }
}

impl Config {
    pub fn with_fast_forward(mut self, fast_forward: bool) -> Self {
        self.fast_forward = fast_forward;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        assert!(worker_count >= 1, "a scheduler needs at least one worker");
        self.worker_count = worker_count;
        self
    }

    pub fn with_strategy(mut self, strategy: SchedulingStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
