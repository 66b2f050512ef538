//! Closed-form check of the accumulated transpose.
//!
//! After `n` passes, cell `a[ij]` holds `ij + n` and `b[ji]` holds
//! `Σ_{k<n} (ij + k) = n·ij + n(n-1)/2`. The benchmark runs one untimed
//! warm-up pass plus `iterations` timed ones, so `n = iterations + 1`.

use super::buffers::Matrices;
use crate::error::{Result, TransposeError};
use crate::schedule::Schedule;

/// Largest aggregate absolute error accepted.
pub const EPSILON: f64 = 1.0e-8;

/// Expected `b[j*order+i]` after `iterations + 1` passes, with `ij = i*order+j`.
#[inline]
pub fn reference(ij: usize, iterations: usize) -> f64 {
    let iterations = iterations as f64;
    let addit = (iterations + 1.0) * iterations / 2.0;
    (ij as f64) * (1.0 + iterations) + addit
}

/// Expected `a[ij]` after `executions` passes.
#[inline]
pub fn expected_source(ij: usize, executions: usize) -> f64 {
    (ij + executions) as f64
}

/// Sum of `|b[j*order+i] - reference(i*order+j)|` over the whole matrix.
pub fn aggregate_error(schedule: &Schedule, matrices: &Matrices, iterations: usize) -> f64 {
    let order = matrices.order();
    let b = matrices.b();
    schedule.sum_2d(order, &|i: usize, j: usize| {
        let ij = i * order + j;
        let ji = j * order + i;
        (b[ji] - reference(ij, iterations)).abs()
    })
}

/// Check `b` against the closed form; the error is returned on success too.
pub fn validate(schedule: &Schedule, matrices: &Matrices, iterations: usize) -> Result<f64> {
    let abserr = aggregate_error(schedule, matrices, iterations);
    if abserr < EPSILON {
        Ok(abserr)
    } else {
        Err(TransposeError::ValidationFailed {
            abserr,
            epsilon: EPSILON,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{initialize, transpose};

    fn run(order: usize, iterations: usize) -> Matrices {
        let schedule = Schedule::sequential();
        let mut m = Matrices::new(order).unwrap();
        initialize(&schedule, &mut m);
        for _ in 0..=iterations {
            transpose(&schedule, &mut m);
        }
        m
    }

    #[test]
    fn test_reference_formula() {
        // one warm-up + one timed pass: ij + (ij + 1)
        assert_eq!(reference(0, 1), 1.0);
        assert_eq!(reference(5, 1), 11.0);
        // 0 + 1 + 2 + 3 + 4 + 5
        assert_eq!(reference(0, 5), 15.0);
        assert_eq!(reference(7, 5), 7.0 * 6.0 + 15.0);
    }

    #[test]
    fn test_validates_after_run() {
        let m = run(10, 5);
        let abserr = validate(&Schedule::sequential(), &m, 5).unwrap();
        assert_eq!(abserr, 0.0);
    }

    #[test]
    fn test_source_closed_form() {
        let m = run(6, 4);
        for (ij, &x) in m.a().iter().enumerate() {
            assert_eq!(x, expected_source(ij, 5));
        }
    }

    #[test]
    fn test_wrong_iteration_count_fails() {
        let m = run(4, 3);
        let err = validate(&Schedule::sequential(), &m, 4).unwrap_err();
        assert!(matches!(err, TransposeError::ValidationFailed { abserr, .. } if abserr > EPSILON));
    }

    #[test]
    fn test_skipping_warm_up_fails() {
        let schedule = Schedule::sequential();
        let mut m = Matrices::new(4).unwrap();
        initialize(&schedule, &mut m);
        for _ in 0..3 {
            transpose(&schedule, &mut m);
        }
        assert!(validate(&schedule, &m, 3).is_err());
    }
}
