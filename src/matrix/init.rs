use super::buffers::{Matrices, SharedMut};
use crate::schedule::{Body2d, Schedule};
use std::ops::Range;

struct InitBody<'a> {
    order: usize,
    a: SharedMut<'a>,
    b: SharedMut<'a>,
}

impl Body2d for InitBody<'_> {
    #[inline(always)]
    fn point(&self, i: usize, j: usize) {
        let ij = i * self.order + j;
        // SAFETY: each (i, j) is visited once and owns cell ij of both buffers.
        unsafe {
            self.a.set(ij, ij as f64);
            self.b.set(ij, 0.0);
        }
    }

    #[inline(always)]
    fn row(&self, i: usize, cols: Range<usize>) {
        let start = i * self.order + cols.start;
        // SAFETY: the run (i, cols) is visited once and owns these cells.
        let (a_row, b_row) = unsafe {
            (
                self.a.slice_mut(start, cols.len()),
                self.b.slice_mut(start, cols.len()),
            )
        };
        for (k, x) in a_row.iter_mut().enumerate() {
            *x = (start + k) as f64;
        }
        b_row.fill(0.0);
    }
}

/// Reset the buffers: `a[i*order+j] = i*order+j`, `b = 0`.
///
/// Uses the same schedule as the transpose so startup cost is representative.
/// Calling it again restores the same state whatever happened in between.
pub fn initialize(schedule: &Schedule, matrices: &mut Matrices) {
    let order = matrices.order();
    let (a, b) = matrices.shared();
    schedule.for_2d(order, &InitBody { order, a, b });
}
