//! Multi-threaded loop backends.
//!
//! Both backends run on a [`Worker`] pool sized once at startup:
//! - `for_static` / `sum_static`: one contiguous chunk per worker
//! - `for_stealing` / `sum_stealing`: small chunks balanced by rayon's work stealing

pub mod fork_join;
pub mod worker;

pub use worker::Worker;
