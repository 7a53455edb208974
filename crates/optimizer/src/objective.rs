//! Mean-variance objectives and their gradients.

use ndarray::{Array1, Array2};

/// What the optimizer maximizes (or minimizes, for volatility).
///
/// All three are evaluated internally as minimization problems; the
/// maximizing objectives are negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Maximize `(return - risk_free) / volatility`.
    #[default]
    MaximizeSharpe,
    /// Maximize expected annual return.
    MaximizeReturn,
    /// Minimize annual volatility.
    MinimizeVolatility,
}

impl Objective {
    /// Human-readable objective name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaximizeSharpe => "Maximize Sharpe Ratio",
            Self::MaximizeReturn => "Maximize Returns",
            Self::MinimizeVolatility => "Minimize Volatility",
        }
    }
}

/// Expected annual return of a weight vector.
#[must_use]
pub(crate) fn portfolio_return(weights: &Array1<f64>, mean_returns: &Array1<f64>) -> f64 {
    mean_returns.dot(weights)
}

/// Annual volatility `sqrt(w' Sigma w)` of a weight vector.
#[must_use]
pub(crate) fn portfolio_volatility(weights: &Array1<f64>, covariance: &Array2<f64>) -> f64 {
    weights.dot(&covariance.dot(weights)).max(0.0).sqrt()
}

/// Sharpe ratio of a weight vector.
#[must_use]
pub(crate) fn sharpe_ratio(
    weights: &Array1<f64>,
    mean_returns: &Array1<f64>,
    covariance: &Array2<f64>,
    risk_free_rate: f64,
) -> f64 {
    let vol = portfolio_volatility(weights, covariance);
    if vol <= 0.0 {
        return 0.0;
    }
    (portfolio_return(weights, mean_returns) - risk_free_rate) / vol
}

/// Minimized objective value and its analytic gradient at `weights`.
pub(crate) fn value_and_gradient(
    objective: Objective,
    weights: &Array1<f64>,
    mean_returns: &Array1<f64>,
    covariance: &Array2<f64>,
    risk_free_rate: f64,
) -> (f64, Array1<f64>) {
    match objective {
        Objective::MaximizeReturn => {
            (-portfolio_return(weights, mean_returns), -mean_returns.clone())
        }
        Objective::MinimizeVolatility => {
            let vol = portfolio_volatility(weights, covariance);
            if vol <= 0.0 {
                (0.0, Array1::zeros(weights.len()))
            } else {
                (vol, covariance.dot(weights) / vol)
            }
        }
        Objective::MaximizeSharpe => {
            let vol = portfolio_volatility(weights, covariance);
            if vol <= 0.0 {
                return (0.0, Array1::zeros(weights.len()));
            }
            let excess = portfolio_return(weights, mean_returns) - risk_free_rate;
            // d(-sharpe)/dw = -mu/vol + excess * Sigma w / vol^3
            let grad =
                covariance.dot(weights) * (excess / vol.powi(3)) - mean_returns / vol;
            (-excess / vol, grad)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn finite_difference(
        objective: Objective,
        w: &Array1<f64>,
        mu: &Array1<f64>,
        cov: &Array2<f64>,
        rf: f64,
    ) -> Array1<f64> {
        let h = 1e-7;
        let mut grad = Array1::zeros(w.len());
        for i in 0..w.len() {
            let mut up = w.clone();
            let mut down = w.clone();
            up[i] += h;
            down[i] -= h;
            let (fu, _) = value_and_gradient(objective, &up, mu, cov, rf);
            let (fd, _) = value_and_gradient(objective, &down, mu, cov, rf);
            grad[i] = (fu - fd) / (2.0 * h);
        }
        grad
    }

    #[test]
    fn analytic_gradients_match_finite_differences() {
        let w = array![0.5, 0.3, 0.2];
        let mu = array![0.12, 0.08, 0.15];
        let cov = array![[0.04, 0.01, 0.00], [0.01, 0.09, 0.02], [0.00, 0.02, 0.16]];
        let rf = 0.05;

        for objective in [
            Objective::MaximizeSharpe,
            Objective::MaximizeReturn,
            Objective::MinimizeVolatility,
        ] {
            let (_, analytic) = value_and_gradient(objective, &w, &mu, &cov, rf);
            let numeric = finite_difference(objective, &w, &mu, &cov, rf);
            for i in 0..3 {
                assert_relative_eq!(analytic[i], numeric[i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn sharpe_matches_return_and_volatility() {
        let w = array![0.6, 0.4];
        let mu = array![0.10, 0.05];
        let cov = array![[0.04, 0.00], [0.00, 0.01]];
        let rf = 0.02;

        let ret = portfolio_return(&w, &mu);
        let vol = portfolio_volatility(&w, &cov);
        assert_relative_eq!(ret, 0.08, epsilon = 1e-12);
        assert_relative_eq!(vol, (0.36 * 0.04 + 0.16 * 0.01_f64).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            sharpe_ratio(&w, &mu, &cov, rf),
            (ret - rf) / vol,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_volatility_sharpe_is_zero() {
        let w = array![1.0];
        let mu = array![0.10];
        let cov = array![[0.0]];
        assert_relative_eq!(sharpe_ratio(&w, &mu, &cov, 0.05), 0.0);
    }
}
