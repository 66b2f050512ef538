use super::buffers::{Matrices, SharedMut};
use crate::schedule::{Body2d, Schedule};
use std::ops::Range;

struct TransposeBody<'a> {
    order: usize,
    a: SharedMut<'a>,
    b: SharedMut<'a>,
}

impl Body2d for TransposeBody<'_> {
    #[inline(always)]
    fn point(&self, i: usize, j: usize) {
        let ij = i * self.order + j;
        let ji = j * self.order + i;
        // SAFETY: (i, j) ↦ ji is a bijection, so this pair is the only one
        // touching a[ji] and b[ij] during this pass.
        unsafe {
            let x = self.a.get(ji);
            self.b.set(ij, self.b.get(ij) + x);
            self.a.set(ji, x + 1.0);
        }
    }

    #[inline(always)]
    fn row(&self, i: usize, cols: Range<usize>) {
        let order = self.order;
        // SAFETY: as in `point`; the run (i, cols) owns b[i*order + cols]
        // and column i of `a` over rows `cols`.
        let b_row = unsafe { self.b.slice_mut(i * order + cols.start, cols.len()) };
        for (dst, j) in b_row.iter_mut().zip(cols) {
            let ji = j * order + i;
            unsafe {
                let x = self.a.get(ji);
                *dst += x;
                self.a.set(ji, x + 1.0);
            }
        }
    }
}

/// One transpose pass: for every `(i, j)`,
/// `b[i*order+j] += a[j*order+i]` then `a[j*order+i] += 1`.
///
/// `b` accumulates across passes and `a` changes every pass, so repeated
/// calls build up a triangular sum rather than copies of the same transpose.
/// Returns after every worker has finished the pass.
///
/// # Example
///
/// ```
/// use transpose::matrix::{self, Matrices};
/// use transpose::schedule::Schedule;
///
/// let schedule = Schedule::sequential();
/// let mut m = Matrices::new(2).unwrap();
/// matrix::initialize(&schedule, &mut m);   // a = [0, 1,
///                                          //      2, 3]
/// matrix::transpose(&schedule, &mut m);
///
/// assert_eq!(m.b(), &[0.0, 2.0,
///                     1.0, 3.0]);
/// assert_eq!(m.a(), &[1.0, 2.0,
///                     3.0, 4.0]);
/// ```
pub fn transpose(schedule: &Schedule, matrices: &mut Matrices) {
    let order = matrices.order();
    let (a, b) = matrices.shared();
    schedule.for_2d(order, &TransposeBody { order, a, b });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::initialize;
    use crate::schedule::LoopShape;

    #[test]
    fn test_single_pass_is_transpose() {
        let schedule = Schedule::sequential();
        let mut m = Matrices::new(3).unwrap();
        initialize(&schedule, &mut m);
        transpose(&schedule, &mut m);

        assert_eq!(m.b(), &[0.0, 3.0, 6.0, 1.0, 4.0, 7.0, 2.0, 5.0, 8.0]);
        let bumped: Vec<f64> = (1..=9).map(|k| k as f64).collect();
        assert_eq!(m.a(), bumped.as_slice());
    }

    #[test]
    fn test_second_pass_sees_bumped_source() {
        let schedule = Schedule::sequential();
        let mut m = Matrices::new(2).unwrap();
        initialize(&schedule, &mut m);
        transpose(&schedule, &mut m);
        transpose(&schedule, &mut m);

        // b[i,j] = a0[j,i] + (a0[j,i] + 1)
        assert_eq!(m.b(), &[1.0, 5.0, 3.0, 7.0]);
        assert_eq!(m.a(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_point_and_row_agree() {
        let run = |schedule: Schedule| {
            let mut m = Matrices::new(11).unwrap();
            initialize(&schedule, &mut m);
            for _ in 0..3 {
                transpose(&schedule, &mut m);
            }
            (m.a().to_vec(), m.b().to_vec())
        };

        let rows = run(Schedule::sequential());
        let points = run(
            Schedule::sequential()
                .with_simd(false)
                .with_shape(LoopShape::Nested)
                .with_tile(Some(3)),
        );
        assert_eq!(rows, points);
    }
}
