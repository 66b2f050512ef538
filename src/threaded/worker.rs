//! Fixed-size worker pool.

use crate::error::{Result, TransposeError};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// A rayon pool with a known number of workers.
///
/// The pool is built once per run and shared by every kernel invocation.
pub struct Worker {
    pool: ThreadPool,
    pub num_cores: usize,
}

impl Worker {
    /// One worker per physical core.
    pub fn new() -> Result<Self> {
        Self::new_with_num_threads(num_cpus::get_physical())
    }

    pub fn new_with_num_threads(num_threads: usize) -> Result<Self> {
        let num_threads = num_threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|idx| format!("transpose-worker-{idx}"))
            .build()
            .map_err(|e| TransposeError::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            num_cores: num_threads,
        })
    }

    pub const fn compute_chunk_size(work_size: usize, num_chunks: usize) -> usize {
        if work_size <= num_chunks {
            1
        } else {
            work_size.div_ceil(num_chunks)
        }
    }

    pub const fn compute_num_chunks(work_size: usize, chunk_size: usize) -> usize {
        if work_size <= chunk_size {
            1
        } else {
            work_size.div_ceil(chunk_size)
        }
    }

    pub const fn get_chunk_size(&self, work_size: usize) -> usize {
        Self::compute_chunk_size(work_size, self.num_cores)
    }

    /// Run `f` inside a scope on this pool; returns once every task spawned
    /// into the scope has finished.
    pub fn scope<'a, F, R>(&self, work_size: usize, f: F) -> R
    where
        F: FnOnce(&rayon::Scope<'a>, usize, usize) -> R,
    {
        let chunk_size = self.get_chunk_size(work_size);
        let num_chunks = Self::compute_num_chunks(work_size, chunk_size);

        self.pool
            .in_place_scope(|scope| f(scope, chunk_size, num_chunks))
    }

    /// Run `op` with this pool as the current rayon pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
