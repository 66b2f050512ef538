//! Fork-join range loops on a [`Worker`] pool.
//!
//! Every call blocks until all chunks are done, so consecutive calls never
//! overlap.

use super::worker::Worker;
use rayon::prelude::*;
use std::ops::Range;

impl Worker {
    /// Split `0..work_size` into one contiguous chunk per worker.
    pub fn for_static<F>(&self, work_size: usize, f: &F)
    where
        F: Fn(Range<usize>) + Sync,
    {
        if work_size == 0 {
            return;
        }

        self.scope(work_size, |scope, chunk_size, num_chunks| {
            for chunk in 0..num_chunks {
                let start = chunk * chunk_size;
                let end = (start + chunk_size).min(work_size);
                scope.spawn(move |_| f(start..end));
            }
        });
    }

    /// Same partitioning as [`Worker::for_static`], one partial sum per chunk.
    pub fn sum_static<F>(&self, work_size: usize, f: &F) -> f64
    where
        F: Fn(Range<usize>) -> f64 + Sync,
    {
        if work_size == 0 {
            return 0.0;
        }

        let chunk_size = self.get_chunk_size(work_size);
        let mut partials = vec![0.0; Self::compute_num_chunks(work_size, chunk_size)];

        self.scope(work_size, |scope, chunk_size, _| {
            for (chunk, partial) in partials.iter_mut().enumerate() {
                let start = chunk * chunk_size;
                let end = (start + chunk_size).min(work_size);
                scope.spawn(move |_| *partial = f(start..end));
            }
        });

        partials.iter().sum()
    }

    /// Hand `grain`-sized chunks to rayon and let idle workers steal them.
    pub fn for_stealing<F>(&self, work_size: usize, grain: usize, f: &F)
    where
        F: Fn(Range<usize>) + Sync,
    {
        let grain = grain.max(1);
        let num_chunks = work_size.div_ceil(grain);

        self.install(|| {
            (0..num_chunks).into_par_iter().for_each(|chunk| {
                let start = chunk * grain;
                f(start..(start + grain).min(work_size));
            })
        });
    }

    pub fn sum_stealing<F>(&self, work_size: usize, grain: usize, f: &F) -> f64
    where
        F: Fn(Range<usize>) -> f64 + Sync,
    {
        let grain = grain.max(1);
        let num_chunks = work_size.div_ceil(grain);

        self.install(|| {
            (0..num_chunks)
                .into_par_iter()
                .map(|chunk| {
                    let start = chunk * grain;
                    f(start..(start + grain).min(work_size))
                })
                .sum()
        })
    }
}
