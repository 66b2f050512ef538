//! Diagnostic output.
//!
//! With the `log_tracing` feature the [`log!`](crate::log) macro forwards to
//! `tracing::trace!`, otherwise it prints to stdout. The benchmark report
//! itself always goes to stdout.

#[cfg(feature = "log_tracing")]
#[doc(hidden)]
pub use tracing;

#[macro_export]
#[cfg(feature = "log_tracing")]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log_utils::tracing::trace!($($arg)*)
    };
}

#[macro_export]
#[cfg(not(feature = "log_tracing"))]
macro_rules! log {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}
