//! Error types for numerical operations.

/// Errors that can occur during numerical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Invalid percentile value.
    #[error("invalid percentile: {0} (must be in [0, 100])")]
    InvalidPercentile(f64),

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// The feasible set of a projection or solve is empty.
    #[error("infeasible problem: {0}")]
    Infeasible(String),

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}
