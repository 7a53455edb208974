//! High-level optimizer tying configuration, constraints and solver
//! together.

use std::collections::BTreeMap;

use cartera_primitives::{CovarianceMatrix, MarketCapBucket, SelectedAsset};
use ndarray::Array1;
use tracing::info;

use crate::{ConstraintSet, Objective, OptimizerError, Portfolio, SolverConfig, objective, portfolio, solve};

/// Risk parameters and exposure caps of one optimization run.
///
/// All caps are weight fractions in `[0, 1]`. An absent industry or bucket
/// entry means no cap on that group.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// What to optimize for.
    pub objective: Objective,
    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,
    /// Per-asset weight cap.
    pub max_stock_weight: f64,
    /// Per-industry exposure caps.
    pub industry_caps: BTreeMap<String, f64>,
    /// Per-bucket exposure caps.
    pub bucket_caps: BTreeMap<MarketCapBucket, f64>,
    /// Iteration budgets and tolerances.
    pub solver: SolverConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            objective: Objective::MaximizeSharpe,
            risk_free_rate: 0.07,
            max_stock_weight: 1.0,
            industry_caps: BTreeMap::new(),
            bucket_caps: BTreeMap::new(),
            solver: SolverConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Reject configurations the solver cannot meaningfully run with.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidConfig`] for a negative or
    /// non-finite risk-free rate, a per-asset cap outside `(0, 1]`, or any
    /// group cap outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if !self.risk_free_rate.is_finite() || self.risk_free_rate < 0.0 {
            return Err(OptimizerError::InvalidConfig(format!(
                "risk-free rate {} must be a non-negative fraction",
                self.risk_free_rate
            )));
        }
        if !(self.max_stock_weight > 0.0 && self.max_stock_weight <= 1.0) {
            return Err(OptimizerError::InvalidConfig(format!(
                "max stock weight {} must be in (0, 1]",
                self.max_stock_weight
            )));
        }
        for (label, cap) in self
            .industry_caps
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .chain(self.bucket_caps.iter().map(|(k, v)| (k.to_string(), *v)))
        {
            if !(0.0..=1.0).contains(&cap) {
                return Err(OptimizerError::InvalidConfig(format!(
                    "cap for '{label}' is {cap}, must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Solves for portfolio weights under the configured constraints.
#[derive(Debug, Clone, Default)]
pub struct PortfolioOptimizer {
    config: OptimizerConfig,
}

impl PortfolioOptimizer {
    /// Create an optimizer with the given configuration.
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Optimize weights for the assets behind a covariance estimate.
    ///
    /// `mean_returns` and the covariance must share the covariance's symbol
    /// order; the solve starts from equal weights, which keeps repeated
    /// runs on the same inputs deterministic.
    ///
    /// # Errors
    /// Returns configuration, feasibility, dimension and convergence
    /// errors; a successful run always yields weights on the capped
    /// simplex with group caps satisfied to tolerance.
    pub fn optimize(
        &self,
        assets: &[SelectedAsset],
        mean_returns: &Array1<f64>,
        covariance: &CovarianceMatrix,
    ) -> Result<Portfolio, OptimizerError> {
        self.config.validate()?;

        let n = covariance.len();
        if n == 0 {
            return Err(OptimizerError::Infeasible("no assets to optimize".to_string()));
        }
        if mean_returns.len() != n {
            return Err(OptimizerError::DimensionMismatch(format!(
                "{} mean returns for {n} covariance columns",
                mean_returns.len()
            )));
        }

        let solve_order = covariance.symbols();
        let constraints = ConstraintSet::build(
            assets,
            solve_order,
            &self.config.industry_caps,
            &self.config.bucket_caps,
        )?;
        constraints.check_feasible(n, self.config.max_stock_weight)?;

        let upper = Array1::from_elem(n, self.config.max_stock_weight);
        let start = Array1::from_elem(n, 1.0 / n as f64);

        let matrix = covariance.matrix();
        let risk_free = self.config.risk_free_rate;
        let objective_kind = self.config.objective;
        let weights = solve(
            |w| objective::value_and_gradient(objective_kind, w, mean_returns, matrix, risk_free),
            &start,
            &upper,
            &constraints,
            &self.config.solver,
        )?;

        let portfolio = portfolio::build(
            &weights,
            solve_order,
            assets,
            mean_returns,
            matrix,
            risk_free,
            objective_kind,
        );
        info!(
            objective = objective_kind.name(),
            holdings = portfolio.holdings.len(),
            annual_return = portfolio.annual_return,
            annual_volatility = portfolio.annual_volatility,
            "optimization complete"
        );
        Ok(portfolio)
    }
}
