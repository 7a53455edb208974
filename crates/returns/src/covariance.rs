//! Annualized covariance estimation and conditioning diagnostics.

use cartera_math::{
    MathError, condition_number, is_symmetric, jacobi_eigenvalues, pairwise_correlation,
    pairwise_covariance,
};
use cartera_primitives::CovarianceMatrix;

use crate::ReturnPanel;

/// Symmetry tolerance for the diagnostics check.
const SYMMETRY_TOL: f64 = 1e-8;

/// Annualized covariance of a return panel.
///
/// Daily pairwise covariance is scaled by the number of trading days the
/// panel actually covers, not a fixed 252: a panel spanning half a year
/// produces a half-year risk estimate.
#[must_use]
pub fn annualized_covariance(panel: &ReturnPanel) -> CovarianceMatrix {
    let scale = panel.n_dates() as f64;
    let cov = pairwise_covariance(panel.values()) * scale;
    CovarianceMatrix::new(panel.symbols().to_vec(), cov)
}

/// Spectral and correlation diagnostics of a covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceDiagnostics {
    /// Eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// Smallest eigenvalue.
    pub smallest_eigenvalue: f64,
    /// Largest eigenvalue.
    pub largest_eigenvalue: f64,
    /// Whether every eigenvalue is strictly positive.
    pub is_positive_definite: bool,
    /// Spectral condition number.
    pub condition_number: f64,
    /// Whether the matrix is symmetric to tolerance.
    pub is_symmetric: bool,
    /// Smallest off-diagonal pairwise correlation.
    pub min_correlation: f64,
    /// Largest off-diagonal pairwise correlation.
    pub max_correlation: f64,
}

impl CovarianceDiagnostics {
    /// Diagnose a covariance matrix against the panel it came from.
    ///
    /// # Errors
    /// Propagates eigenvalue computation failures.
    pub fn compute(cov: &CovarianceMatrix, panel: &ReturnPanel) -> Result<Self, MathError> {
        let eigenvalues = jacobi_eigenvalues(cov.matrix())?;
        let smallest = eigenvalues.first().copied().unwrap_or(f64::NAN);
        let largest = eigenvalues.last().copied().unwrap_or(f64::NAN);

        let corr = pairwise_correlation(panel.values());
        let n = corr.nrows();
        let mut min_corr = f64::INFINITY;
        let mut max_corr = f64::NEG_INFINITY;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    min_corr = min_corr.min(corr[[i, j]]);
                    max_corr = max_corr.max(corr[[i, j]]);
                }
            }
        }
        // A single asset has no off-diagonal pairs.
        if n < 2 {
            min_corr = f64::NAN;
            max_corr = f64::NAN;
        }

        Ok(Self {
            is_positive_definite: eigenvalues.iter().all(|&e| e > 0.0),
            condition_number: condition_number(&eigenvalues),
            is_symmetric: is_symmetric(cov.matrix(), SYMMETRY_TOL),
            smallest_eigenvalue: smallest,
            largest_eigenvalue: largest,
            eigenvalues,
            min_correlation: min_corr,
            max_correlation: max_corr,
        })
    }
}
