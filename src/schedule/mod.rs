//! Loop schedules for the matrix kernels.
//!
//! A [`Schedule`] is resolved once from the [`Config`] and then drives every
//! kernel call of the run. It combines three independent choices:
//!
//! - backend: sequential, static chunks or work stealing (see [`Backend`])
//! - shape: one collapsed 2D range, or an outer 1D loop with an inner 1D loop
//! - tiling: optional `tile × tile` blocks over the 2D index space
//!
//! plus an inner-loop hint (`simd`) that hands whole contiguous row runs to
//! the kernel instead of single points.
//!
//! Every index pair of `[0, order) × [0, order)` is handed to exactly one
//! worker exactly once per call, and every call returns only after all
//! workers are done.

pub mod backend;

pub use backend::Backend;

use crate::config::Config;
use crate::error::Result;
use std::ops::Range;

/// Minimum number of matrix elements per work-stealing chunk.
pub const MIN_GRAIN_ELEMENTS: usize = 4096;

/// Body of a 2D loop over `(i, j)`.
///
/// `row` must behave exactly like calling `point` for every `j` in `cols`;
/// kernels override it with a slice-based loop the compiler can vectorize.
pub trait Body2d: Sync {
    fn point(&self, i: usize, j: usize);

    fn row(&self, i: usize, cols: Range<usize>) {
        for j in cols {
            self.point(i, j);
        }
    }
}

/// How the 2D index space is handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopShape {
    /// `nested=y`: the whole 2D space (or its tile grid) is one linear range.
    Range2d,
    /// `nested=n`: the outer index (or tile row) is distributed, the inner
    /// loop runs inside each outer step.
    Nested,
}

/// Loop policy for a whole run, shared by every kernel call.
pub struct Schedule {
    backend: Backend,
    shape: LoopShape,
    simd: bool,
    tile: Option<usize>,
}

impl Schedule {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            shape: LoopShape::Range2d,
            simd: true,
            tile: None,
        }
    }

    pub fn sequential() -> Self {
        Self::new(Backend::Sequential)
    }

    /// Resolve the schedule for a run, building the worker pool if needed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = Backend::new(config.threading, config.threads)?;
        let shape = if config.nested {
            LoopShape::Range2d
        } else {
            LoopShape::Nested
        };
        let tile = config
            .tiled
            .then_some(config.tile_size.min(config.order));

        Ok(Self::new(backend)
            .with_shape(shape)
            .with_simd(config.simd)
            .with_tile(tile))
    }

    pub fn with_shape(mut self, shape: LoopShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_simd(mut self, simd: bool) -> Self {
        self.simd = simd;
        self
    }

    /// A tile edge of 0 is treated as 1.
    pub fn with_tile(mut self, tile: Option<usize>) -> Self {
        self.tile = tile.map(|t| t.max(1));
        self
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn shape(&self) -> LoopShape {
        self.shape
    }

    pub fn simd(&self) -> bool {
        self.simd
    }

    pub fn tile(&self) -> Option<usize> {
        self.tile
    }

    /// Run `body` for every `k` in `0..n`.
    ///
    /// `elements_per_item` is the amount of matrix work behind one `k`; it
    /// sets how many items go into a work-stealing chunk.
    pub fn for_1d<F>(&self, n: usize, elements_per_item: usize, body: &F)
    where
        F: Fn(usize) + Sync,
    {
        self.backend.for_chunks(
            n,
            grain(elements_per_item),
            &|range: Range<usize>| range.for_each(body),
        );
    }

    /// Run `body` for every `(i, j)` in `[0, order) × [0, order)`.
    pub fn for_2d<B: Body2d>(&self, order: usize, body: &B) {
        // a tile wider than the matrix is one tile
        let tile = self.tile.map(|t| t.min(order.max(1)));
        match (self.shape, tile) {
            (LoopShape::Range2d, None) => {
                self.backend
                    .for_chunks(order * order, grain(1), &|span: Range<usize>| {
                        self.run_span(body, order, span)
                    });
            }
            (LoopShape::Range2d, Some(tile)) => {
                let tiles = order.div_ceil(tile);
                self.backend
                    .for_chunks(tiles * tiles, grain(tile * tile), &|span: Range<usize>| {
                        for t in span {
                            self.run_tile(body, order, tile, t / tiles, t % tiles);
                        }
                    });
            }
            (LoopShape::Nested, None) => {
                self.for_1d(order, order, &|i| self.run_row(body, i, 0..order));
            }
            (LoopShape::Nested, Some(tile)) => {
                let tiles = order.div_ceil(tile);
                self.for_1d(tiles, tile * order, &|ti| {
                    for tj in 0..tiles {
                        self.run_tile(body, order, tile, ti, tj);
                    }
                });
            }
        }
    }

    /// Sum `f(i, j)` over `[0, order) × [0, order)` with this schedule's backend.
    pub fn sum_2d<F>(&self, order: usize, f: &F) -> f64
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        self.backend
            .sum_chunks(order, grain(order), &|rows: Range<usize>| {
                rows.map(|i| (0..order).map(|j| f(i, j)).sum::<f64>())
                    .sum::<f64>()
            })
    }

    fn run_row<B: Body2d>(&self, body: &B, i: usize, cols: Range<usize>) {
        if self.simd {
            body.row(i, cols);
        } else {
            for j in cols {
                body.point(i, j);
            }
        }
    }

    fn run_tile<B: Body2d>(&self, body: &B, order: usize, tile: usize, ti: usize, tj: usize) {
        let rows = ti * tile..((ti + 1) * tile).min(order);
        let cols = tj * tile..((tj + 1) * tile).min(order);
        for i in rows {
            self.run_row(body, i, cols.clone());
        }
    }

    /// Linear span of the row-major index space, split at row boundaries.
    fn run_span<B: Body2d>(&self, body: &B, order: usize, span: Range<usize>) {
        let mut k = span.start;
        while k < span.end {
            let (i, j) = (k / order, k % order);
            let end = order.min(j + (span.end - k));
            self.run_row(body, i, j..end);
            k += end - j;
        }
    }
}

fn grain(elements_per_item: usize) -> usize {
    (MIN_GRAIN_ELEMENTS / elements_per_item.max(1)).max(1)
}
