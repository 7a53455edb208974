//! Symmetric eigenvalue computation and conditioning diagnostics.

use ndarray::Array2;

use crate::MathError;

/// Maximum number of Jacobi sweeps before giving up.
const MAX_SWEEPS: usize = 100;

/// Compute all eigenvalues of a symmetric matrix with the cyclic Jacobi
/// method.
///
/// The input is symmetrized as `(A + A^T) / 2` first, so matrices that are
/// symmetric only to numerical tolerance are handled. Eigenvalues are
/// returned in ascending order.
///
/// # Errors
/// Returns an error if the matrix is empty, not square, contains non-finite
/// values, or the rotation sweep does not reduce the off-diagonal norm
/// within the sweep budget.
pub fn jacobi_eigenvalues(a: &Array2<f64>) -> Result<Vec<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: a.ncols() });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite matrix entry".to_string()));
    }

    // Work on the symmetric part.
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            m[[i, j]] = (a[[i, j]] + a[[j, i]]) / 2.0;
        }
    }

    let frobenius: f64 = m.iter().map(|v| v * v).sum::<f64>().sqrt();
    let tol = 1e-14 * frobenius.max(1.0);

    for _ in 0..MAX_SWEEPS {
        let off: f64 = off_diagonal_norm(&m);
        if off <= tol {
            let mut eigs: Vec<f64> = (0..n).map(|i| m[[i, i]]).collect();
            eigs.sort_by(|a, b| a.total_cmp(b));
            return Ok(eigs);
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[[p, q]];
                if apq.abs() <= tol / (n * n) as f64 {
                    continue;
                }

                // Classic Jacobi rotation annihilating m[p][q].
                let app = m[[p, p]];
                let aqq = m[[q, q]];
                let theta = (aqq - app) / (2.0 * apq);
                let t = if theta >= 0.0 {
                    1.0 / (theta + (1.0 + theta * theta).sqrt())
                } else {
                    1.0 / (theta - (1.0 + theta * theta).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = m[[k, p]];
                    let akq = m[[k, q]];
                    m[[k, p]] = c * akp - s * akq;
                    m[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = m[[p, k]];
                    let aqk = m[[q, k]];
                    m[[p, k]] = c * apk - s * aqk;
                    m[[q, k]] = s * apk + c * aqk;
                }
            }
        }
    }

    Err(MathError::NumericalInstability(format!(
        "Jacobi iteration did not converge in {MAX_SWEEPS} sweeps"
    )))
}

fn off_diagonal_norm(m: &Array2<f64>) -> f64 {
    let n = m.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += m[[i, j]] * m[[i, j]];
            }
        }
    }
    sum.sqrt()
}

/// Spectral condition number `max|eig| / min|eig|` from a set of
/// eigenvalues.
///
/// Returns `f64::INFINITY` for a (numerically) singular matrix.
#[must_use]
pub fn condition_number(eigenvalues: &[f64]) -> f64 {
    let max_abs = eigenvalues.iter().map(|e| e.abs()).fold(0.0_f64, f64::max);
    let min_abs = eigenvalues.iter().map(|e| e.abs()).fold(f64::INFINITY, f64::min);

    if min_abs <= f64::EPSILON * max_abs.max(1.0) { f64::INFINITY } else { max_abs / min_abs }
}

/// Check whether a matrix is symmetric to an absolute tolerance.
#[must_use]
pub fn is_symmetric(a: &Array2<f64>, tol: f64) -> bool {
    let n = a.nrows();
    if a.ncols() != n {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (a[[i, j]] - a[[j, i]]).abs() > tol {
                return false;
            }
        }
    }
    true
}
