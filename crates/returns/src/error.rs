//! Error types for return estimation.

/// Errors that can occur while building return series and covariance.
#[derive(Debug, thiserror::Error)]
pub enum ReturnsError {
    /// Price provider error that could not be skipped.
    #[error(transparent)]
    Provider(#[from] crate::ProviderError),

    /// Math operation error.
    #[error("math error: {0}")]
    Math(#[from] cartera_math::MathError),

    /// Every requested asset failed to produce a usable return series.
    #[error("no asset produced a usable return series ({attempted} attempted)")]
    NoReturnsData {
        /// Number of assets attempted.
        attempted: usize,
    },

    /// The analysis window is degenerate.
    #[error("invalid analysis window: {0}")]
    InvalidWindow(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ReturnsError::NoReturnsData { attempted: 7 };
        assert!(err.to_string().contains('7'));
    }
}
