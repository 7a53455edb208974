//! Error types for portfolio optimization.

/// Errors that can occur while optimizing portfolio weights.
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    /// Configuration rejected before the solve.
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    /// The constraint set admits no feasible portfolio.
    #[error("infeasible constraints: {0}")]
    Infeasible(String),

    /// The solver exhausted its iteration budget.
    #[error("optimization did not converge: {message}")]
    NotConverged {
        /// What the solver was still violating when it gave up.
        message: String,
    },

    /// Math operation error.
    #[error("math error: {0}")]
    Math(#[from] cartera_math::MathError),

    /// Input dimensions disagree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OptimizerError::NotConverged { message: "group cap violated".to_string() };
        assert!(err.to_string().contains("group cap violated"));
    }
}
