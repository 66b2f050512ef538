//! Matrix buffers and the kernels that run over them.
//!
//! All kernels take the [`Schedule`](crate::schedule::Schedule) resolved at
//! startup, so initialization, transpose and validation share one policy.

pub mod buffers;
pub mod init;
pub mod kernel;
pub mod validate;

pub use buffers::Matrices;
pub use init::initialize;
pub use kernel::transpose;
pub use validate::{EPSILON, aggregate_error, reference, validate};
