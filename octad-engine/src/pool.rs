//! Caller-owned worker pool for parallel minimal-vector enumeration.
//!
//! Enumeration is embarrassingly parallel over independent combinatorial
//! chunks, so the only primitive needed is "run this fork-join region on
//! my threads". The pool is an explicit object owned by the caller and
//! passed by reference into the enumeration entry points — there is no
//! process-wide ambient pool, and teardown is an explicit call rather
//! than a side effect of some global's lifetime.

use anyhow::{Context, Result};

/// An explicitly constructed, explicitly shut down thread pool.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `threads` workers; `0` means one per available
    /// core.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("octad-worker-{i}"))
            .build()
            .context("failed to spawn worker pool")?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run a fork-join region on this pool's threads. Parallel iterators
    /// inside `op` use these workers, not any global pool.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }

    /// Tear the pool down, joining its worker threads.
    pub fn shutdown(self) {
        drop(self.pool);
    }
}
