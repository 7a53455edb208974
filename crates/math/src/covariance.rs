//! Sample covariance and correlation over gapped return panels.

use ndarray::Array2;

/// Pairwise sample covariance (ddof = 1) of a panel with gaps.
///
/// `panel` holds one row per date and one column per asset, with `NaN`
/// marking days an asset has no observation. Each pair (i, j) is estimated
/// over the dates where both assets are observed; pairs with fewer than two
/// joint observations get covariance 0. The result is symmetric by
/// construction.
#[must_use]
pub fn pairwise_covariance(panel: &Array2<f64>) -> Array2<f64> {
    let n = panel.ncols();
    let mut cov = Array2::zeros((n, n));

    for i in 0..n {
        for j in i..n {
            let value = joint_moment(panel, i, j).0;
            cov[[i, j]] = value;
            cov[[j, i]] = value;
        }
    }

    cov
}

/// Pairwise sample correlation over the same joint observations as
/// [`pairwise_covariance`].
///
/// Diagonal entries are 1; pairs with degenerate joint samples (fewer than
/// two observations or zero variance) get correlation 0.
#[must_use]
pub fn pairwise_correlation(panel: &Array2<f64>) -> Array2<f64> {
    let n = panel.ncols();
    let mut corr = Array2::zeros((n, n));

    for i in 0..n {
        corr[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let (cov_ij, var_i, var_j) = joint_moment(panel, i, j);
            let denom = (var_i * var_j).sqrt();
            let value = if denom > 0.0 { cov_ij / denom } else { 0.0 };
            corr[[i, j]] = value;
            corr[[j, i]] = value;
        }
    }

    corr
}

/// Covariance and both variances of columns (i, j) over their jointly
/// observed dates.
fn joint_moment(panel: &Array2<f64>, i: usize, j: usize) -> (f64, f64, f64) {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();

    for t in 0..panel.nrows() {
        let x = panel[[t, i]];
        let y = panel[[t, j]];
        if x.is_finite() && y.is_finite() {
            xs.push(x);
            ys.push(y);
        }
    }

    let k = xs.len();
    if k < 2 {
        return (0.0, 0.0, 0.0);
    }

    let mean_x = xs.iter().sum::<f64>() / k as f64;
    let mean_y = ys.iter().sum::<f64>() / k as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for t in 0..k {
        let dx = xs[t] - mean_x;
        let dy = ys[t] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (k - 1) as f64;
    (cov / denom, var_x / denom, var_y / denom)
}
