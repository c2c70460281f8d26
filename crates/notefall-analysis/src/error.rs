//! Error types for spectral analysis.

use thiserror::Error;

/// Errors raised while transforming or building a waterfall.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// FFT input length is not a power of two.
    #[error("FFT length must be a power of two, got {len}")]
    InvalidLength {
        /// Offending number of points.
        len: usize,
    },

    /// A construction parameter violates its constraint.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Standard I/O error while exporting.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Create an invalid argument error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidArgument(reason.into())
    }
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
