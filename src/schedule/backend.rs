//! Loop backends: who runs the chunks of a range.

use crate::config::Threading;
use crate::error::Result;
#[cfg(not(feature = "parallel"))]
use crate::error::TransposeError;
#[cfg(feature = "parallel")]
use crate::threaded::Worker;
use std::ops::Range;

/// Who runs the chunks of a loop: the calling thread or a worker pool.
pub enum Backend {
    Sequential,
    #[cfg(feature = "parallel")]
    Static(Worker),
    #[cfg(feature = "parallel")]
    WorkStealing(Worker),
}

impl Backend {
    /// Build the backend for `threading`.
    ///
    /// Threaded backends need the `parallel` feature; without it they are
    /// reported as [`TransposeError::Unsupported`].
    pub fn new(threading: Threading, threads: Option<usize>) -> Result<Self> {
        match threading {
            Threading::Sequential => Ok(Backend::Sequential),
            #[cfg(feature = "parallel")]
            Threading::Static => Ok(Backend::Static(build_worker(threads)?)),
            #[cfg(feature = "parallel")]
            Threading::WorkStealing => Ok(Backend::WorkStealing(build_worker(threads)?)),
            #[cfg(not(feature = "parallel"))]
            other => {
                let _ = threads;
                Err(TransposeError::Unsupported(other.label()))
            }
        }
    }

    pub fn threading(&self) -> Threading {
        match self {
            Backend::Sequential => Threading::Sequential,
            #[cfg(feature = "parallel")]
            Backend::Static(_) => Threading::Static,
            #[cfg(feature = "parallel")]
            Backend::WorkStealing(_) => Threading::WorkStealing,
        }
    }

    pub fn num_threads(&self) -> usize {
        match self {
            Backend::Sequential => 1,
            #[cfg(feature = "parallel")]
            Backend::Static(worker) | Backend::WorkStealing(worker) => worker.num_cores,
        }
    }

    /// Run `f` over disjoint chunks covering `0..work_size` and wait for all of them.
    ///
    /// `grain` is the chunk length for work stealing; other backends ignore it.
    #[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
    pub(crate) fn for_chunks<F>(&self, work_size: usize, grain: usize, f: &F)
    where
        F: Fn(Range<usize>) + Sync,
    {
        match self {
            Backend::Sequential if work_size == 0 => {}
            Backend::Sequential => f(0..work_size),
            #[cfg(feature = "parallel")]
            Backend::Static(worker) => worker.for_static(work_size, f),
            #[cfg(feature = "parallel")]
            Backend::WorkStealing(worker) => worker.for_stealing(work_size, grain, f),
        }
    }

    /// Sum of `f` over disjoint chunks covering `0..work_size`.
    #[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
    pub(crate) fn sum_chunks<F>(&self, work_size: usize, grain: usize, f: &F) -> f64
    where
        F: Fn(Range<usize>) -> f64 + Sync,
    {
        match self {
            Backend::Sequential => f(0..work_size),
            #[cfg(feature = "parallel")]
            Backend::Static(worker) => worker.sum_static(work_size, f),
            #[cfg(feature = "parallel")]
            Backend::WorkStealing(worker) => worker.sum_stealing(work_size, grain, f),
        }
    }
}

#[cfg(feature = "parallel")]
fn build_worker(threads: Option<usize>) -> Result<Worker> {
    let worker = match threads {
        Some(n) => Worker::new_with_num_threads(n)?,
        None => Worker::new()?,
    };
    crate::log!("Built worker pool with {} threads", worker.num_cores);
    Ok(worker)
}
