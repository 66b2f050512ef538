//! The source and destination buffers.

use crate::config::MAX_ORDER;
use crate::error::{Result, TransposeError};
use std::marker::PhantomData;

/// Two `order × order` row-major `f64` buffers: `a` is read and bumped,
/// `b` accumulates the transpose.
///
/// Both are allocated once and never resized.
pub struct Matrices {
    order: usize,
    a: Box<[f64]>,
    b: Box<[f64]>,
}

impl Matrices {
    /// Allocate zeroed buffers.
    ///
    /// Fails without allocating if `order` is 0 or `order²` would overflow a
    /// signed 32-bit linear index.
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(TransposeError::InvalidOrder(0));
        }
        if order > MAX_ORDER {
            return Err(TransposeError::OrderOverflow {
                order,
                max: MAX_ORDER,
            });
        }

        let nelems = order * order;
        Ok(Self {
            order,
            a: vec![0.0; nelems].into_boxed_slice(),
            b: vec![0.0; nelems].into_boxed_slice(),
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn a(&self) -> &[f64] {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Bytes moved by one transpose: one read of `a`, one write of `b`.
    pub fn bytes_per_transpose(&self) -> usize {
        2 * self.a.len() * size_of::<f64>()
    }

    /// Views of `a` and `b` that kernel bodies can share across workers.
    pub(crate) fn shared(&mut self) -> (SharedMut<'_>, SharedMut<'_>) {
        (SharedMut::new(&mut self.a), SharedMut::new(&mut self.b))
    }
}

/// A mutable slice that may be written from several workers at once.
///
/// Callers guarantee that no index is touched by two workers during the
/// same loop; the schedules hand out each `(i, j)` pair exactly once and the
/// kernels map pairs to distinct cells.
#[derive(Clone, Copy)]
pub(crate) struct SharedMut<'a> {
    ptr: *mut f64,
    len: usize,
    _marker: PhantomData<&'a mut [f64]>,
}

unsafe impl Send for SharedMut<'_> {}
unsafe impl Sync for SharedMut<'_> {}

impl<'a> SharedMut<'a> {
    fn new(slice: &'a mut [f64]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `idx < len` and no other worker writes `idx` concurrently.
    #[inline(always)]
    pub(crate) unsafe fn get(&self, idx: usize) -> f64 {
        debug_assert!(idx < self.len);
        unsafe { *self.ptr.add(idx) }
    }

    /// # Safety
    ///
    /// `idx < len` and no other worker touches `idx` concurrently.
    #[inline(always)]
    pub(crate) unsafe fn set(&self, idx: usize, value: f64) {
        debug_assert!(idx < self.len);
        unsafe { *self.ptr.add(idx) = value }
    }

    /// # Safety
    ///
    /// `start + len` is in bounds and no other worker touches that range
    /// while the returned slice is alive.
    #[inline(always)]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn slice_mut(&self, start: usize, len: usize) -> &mut [f64] {
        debug_assert!(start + len <= self.len);
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(start), len) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let m = Matrices::new(5).unwrap();
        assert_eq!(m.order(), 5);
        assert_eq!(m.a().len(), 25);
        assert_eq!(m.b().len(), 25);
        assert!(m.a().iter().chain(m.b()).all(|&x| x == 0.0));
    }

    #[test]
    fn test_overflow_guard() {
        assert!(matches!(
            Matrices::new(50000),
            Err(TransposeError::OrderOverflow { .. })
        ));
        assert!(matches!(
            Matrices::new(0),
            Err(TransposeError::InvalidOrder(0))
        ));
    }

    #[test]
    fn test_bytes_per_transpose() {
        let m = Matrices::new(10).unwrap();
        assert_eq!(m.bytes_per_transpose(), 2 * 100 * 8);
    }

    #[test]
    fn test_shared_views_write_through() {
        let mut m = Matrices::new(3).unwrap();
        {
            let (a, b) = m.shared();
            unsafe {
                a.set(4, 2.5);
                b.slice_mut(6, 3).fill(1.0);
                assert_eq!(a.get(4), 2.5);
            }
        }
        assert_eq!(m.a()[4], 2.5);
        assert_eq!(&m.b()[6..], &[1.0, 1.0, 1.0]);
    }
}
