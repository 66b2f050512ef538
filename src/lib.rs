//! Matrix transpose bandwidth benchmark.
//!
//! Each pass reads `A` column-wise and accumulates it row-wise into `B`
//! (`B += Aᵀ`), then bumps every element of `A` by one. Repeating the pass
//! gives a stable timing, and the final `B` has a closed form that checks
//! every cell.
//!
//! ## Usage
//!
//! ```
//! use transpose::bench;
//! use transpose::config::Config;
//! use transpose::schedule::Schedule;
//!
//! let config = Config::from_args(["5", "64", "tiled=y", "tile=16"]).unwrap();
//! let schedule = Schedule::from_config(&config).unwrap();
//!
//! let report = bench::run(&config, &schedule).unwrap();
//! assert!(report.abserr < 1e-8);
//! ```
//!
//! ## What's inside
//!
//! - Sequential, static-chunk and work-stealing loop backends (rayon)
//! - Collapsed 2D or nested 1D loop shapes, optional tiling
//! - Row-run inner loops the compiler can vectorize
//! - Closed-form validation of the accumulated result

pub mod bench;
pub mod config;
pub mod error;
pub mod log_utils;
pub mod matrix;
pub mod schedule;
#[cfg(feature = "parallel")]
pub mod threaded;

pub use config::Config;
pub use error::{Result, TransposeError};
pub use matrix::Matrices;
pub use schedule::Schedule;
