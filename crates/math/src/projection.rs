//! Euclidean projection onto the capped simplex.

use ndarray::Array1;

use crate::MathError;

/// Bisection iterations for the simplex shift; each halves the bracket.
const BISECTION_ITERS: usize = 100;

/// Project a point onto `{ w : 0 <= w_i <= upper_i, sum(w) = 1 }`.
///
/// The projection has the closed form `w_i = clamp(v_i - lambda, 0,
/// upper_i)` where the shift `lambda` makes the weights sum to one. The
/// clamped sum is monotone non-increasing in `lambda`, so `lambda` is found
/// by bisection.
///
/// # Errors
/// Returns [`MathError::Infeasible`] when `sum(upper) < 1` (no point
/// satisfies both the caps and the budget), and dimension/validity errors
/// for malformed input.
pub fn project_capped_simplex(
    v: &Array1<f64>,
    upper: &Array1<f64>,
) -> Result<Array1<f64>, MathError> {
    let n = v.len();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if upper.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: upper.len() });
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite projection input".to_string()));
    }
    if upper.iter().any(|u| *u < 0.0) {
        return Err(MathError::Infeasible("negative upper bound".to_string()));
    }

    let cap_sum: f64 = upper.sum();
    if cap_sum < 1.0 - 1e-12 {
        return Err(MathError::Infeasible(format!(
            "upper bounds sum to {cap_sum:.6}, cannot reach a total weight of 1"
        )));
    }

    let clamped_sum = |lambda: f64| -> f64 {
        v.iter().zip(upper.iter()).map(|(vi, ui)| (vi - lambda).clamp(0.0, *ui)).sum()
    };

    // Bracket the shift: at lo every coordinate is at its cap, at hi all are 0.
    let mut lo = v
        .iter()
        .zip(upper.iter())
        .map(|(vi, ui)| vi - ui)
        .fold(f64::INFINITY, f64::min)
        .min(0.0);
    let mut hi = v.iter().fold(f64::NEG_INFINITY, |acc, vi| acc.max(*vi)).max(1.0);

    for _ in 0..BISECTION_ITERS {
        let mid = (lo + hi) / 2.0;
        if clamped_sum(mid) > 1.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let lambda = (lo + hi) / 2.0;
    let mut w: Array1<f64> =
        v.iter().zip(upper.iter()).map(|(vi, ui)| (vi - lambda).clamp(0.0, *ui)).collect();

    // Remove the residual bisection error without leaving the box.
    let mut drift = 1.0 - w.sum();
    for i in 0..n {
        if drift.abs() < 1e-15 {
            break;
        }
        let headroom = if drift > 0.0 { upper[i] - w[i] } else { w[i] };
        let adjust = drift.signum() * drift.abs().min(headroom);
        w[i] += adjust;
        drift -= adjust;
    }

    Ok(w)
}
