//! Error types for the screening stages.

/// Errors that can occur during cleaning, normalization, scoring or
/// selection.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Math operation error.
    #[error("math error: {0}")]
    Math(#[from] cartera_math::MathError),

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// No columns selected for an operation that needs at least one.
    #[error("no columns selected")]
    NoColumnsSelected,

    /// Composite weights do not sum to 100 within tolerance.
    #[error("composite weights sum to {sum:.2}, expected 100.00 +/- {tolerance}")]
    WeightSum {
        /// Actual weight sum.
        sum: f64,
        /// Allowed deviation from 100.
        tolerance: f64,
    },

    /// A scored column has no weight assigned.
    #[error("no weight assigned for column: {0}")]
    MissingWeight(String),

    /// Percentile outside [1, 100].
    #[error("invalid selection percentile: {0} (must be in [1, 100])")]
    InvalidPercentile(f64),

    /// An asset has neither a primary nor a secondary exchange code.
    #[error("asset '{0}' has no exchange code; cannot derive a ticker")]
    MissingExchangeCode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScreenError::WeightSum { sum: 98.5, tolerance: 0.1 };
        assert!(err.to_string().contains("98.50"));

        let err = ScreenError::MissingExchangeCode("Acme".to_string());
        assert!(err.to_string().contains("Acme"));
    }
}
