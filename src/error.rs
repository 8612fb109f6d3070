//! Error types for keypoint estimation.

use thiserror::Error;

/// Errors raised by the linear algebra, the estimators and the smoothing filters.
///
/// All errors are raised before any state is mutated. Nothing is retried internally,
/// the caller decides whether to skip the frame, reset the filter or abort.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// Operand or measurement shape does not match the configured dimension.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Closed form inversion only exists for 2x2 and 3x3 matrices.
    #[error("Unsupported matrix size {rows}x{cols} for inversion")]
    UnsupportedSize { rows: usize, cols: usize },

    /// Determinant is zero, near zero or NaN.
    #[error("Singular matrix")]
    Singular,

    /// A covariance matrix failed the reciprocal condition check.
    #[error("Not positive semi-definite: {0}")]
    NotPositiveSemiDefinite(&'static str),
}

impl FilterError {
    pub(crate) fn shape(expected: (usize, usize), actual: (usize, usize)) -> Self {
        FilterError::DimensionMismatch { expected, actual }
    }
}
