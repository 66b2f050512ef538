//! Error type shared by configuration, scheduling and validation.

/// Errors that can stop a benchmark run.
///
/// Everything except [`TransposeError::ValidationFailed`] is raised before
/// the matrices are allocated.
#[derive(Debug, thiserror::Error)]
pub enum TransposeError {
    /// Too few positional arguments.
    #[error("Usage: <# iterations> <matrix order> [for={{seq,omp,tbb}} simd={{y,n}} nested={{y,n}} tiled={{y,n}} permute={{ij,ji}} threads=<n> tile=<n> verbose={{y,n}}]")]
    Usage,

    /// A numeric argument could not be parsed.
    #[error("ERROR: {name} must be an integer, got '{value}'")]
    NotAnInteger { name: &'static str, value: String },

    #[error("ERROR: iterations must be >= 1, got {0}")]
    InvalidIterations(i64),

    #[error("ERROR: Matrix Order must be greater than 0, got {0}")]
    InvalidOrder(i64),

    /// `order * order` would not fit a signed 32-bit linear index.
    #[error("ERROR: matrix dimension {order} too large - overflow risk (max {max})")]
    OrderOverflow { order: usize, max: usize },

    #[error("ERROR: thread count must be >= 1, got '{0}'")]
    InvalidThreads(String),

    #[error("ERROR: tile size must be >= 1, got '{0}'")]
    InvalidTile(String),

    /// The requested loop backend was not compiled into this build.
    #[error("ERROR: {0} threading is not supported by this build (enable the `parallel` feature)")]
    Unsupported(&'static str),

    /// The worker pool could not be created.
    #[error("ERROR: failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error("ERROR: Aggregate squared error {abserr:.15} exceeds threshold {epsilon:.15}")]
    ValidationFailed { abserr: f64, epsilon: f64 },
}

/// Convenience alias for `Result<T, TransposeError>`.
pub type Result<T> = std::result::Result<T, TransposeError>;
