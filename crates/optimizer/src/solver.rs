//! Augmented-Lagrangian solver over the capped simplex.

use cartera_math::project_capped_simplex;
use ndarray::Array1;
use tracing::{debug, trace};

use crate::{ConstraintSet, OptimizerError};

/// Armijo sufficient-decrease coefficient.
const ARMIJO_C: f64 = 1e-4;

/// Maximum step halvings per line search.
const MAX_BACKTRACKS: usize = 40;

/// Iteration budgets and tolerances of the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Multiplier/penalty updates.
    pub max_outer_iterations: usize,
    /// Projected-gradient steps per subproblem.
    pub max_inner_iterations: usize,
    /// Step-norm tolerance for inner convergence.
    pub step_tolerance: f64,
    /// Largest group-cap violation accepted in the final iterate.
    pub constraint_tolerance: f64,
    /// Starting quadratic penalty.
    pub initial_penalty: f64,
    /// Penalty multiplier applied when violations persist.
    pub penalty_growth: f64,
    /// Penalty ceiling.
    pub max_penalty: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_outer_iterations: 30,
            max_inner_iterations: 500,
            step_tolerance: 1e-10,
            constraint_tolerance: 1e-7,
            initial_penalty: 10.0,
            penalty_growth: 10.0,
            max_penalty: 1e8,
        }
    }
}

/// Minimize a smooth objective over the capped simplex with group caps.
///
/// `value_and_grad` evaluates the objective being minimized and its
/// gradient. The budget (`sum(w) = 1`) and box (`0 <= w_i <= upper_i`)
/// constraints are enforced exactly at every iterate by projection; the
/// group caps in `constraints` are brought to tolerance by the augmented
/// Lagrangian outer loop.
///
/// # Errors
/// Returns [`OptimizerError::NotConverged`] when the iteration budget runs
/// out with a group cap still violated, and propagates projection failures
/// (an infeasible box, non-finite values).
pub fn solve<F>(
    value_and_grad: F,
    start: &Array1<f64>,
    upper: &Array1<f64>,
    constraints: &ConstraintSet,
    config: &SolverConfig,
) -> Result<Array1<f64>, OptimizerError>
where
    F: Fn(&Array1<f64>) -> (f64, Array1<f64>),
{
    let n = start.len();
    let mut w = project_capped_simplex(start, upper)?;
    let mut multipliers = vec![0.0_f64; constraints.len()];
    let mut penalty = config.initial_penalty;

    for outer in 0..config.max_outer_iterations {
        // Augmented Lagrangian of the current multiplier/penalty state.
        let augmented = |x: &Array1<f64>| -> (f64, Array1<f64>) {
            let (mut value, mut grad) = value_and_grad(x);
            for (j, g) in constraints.groups().iter().enumerate() {
                let shifted = multipliers[j] / penalty + g.violation(x);
                if shifted > 0.0 {
                    value += penalty / 2.0 * shifted * shifted
                        - multipliers[j] * multipliers[j] / (2.0 * penalty);
                    let coeff = penalty * shifted;
                    for &i in &g.indices {
                        grad[i] += coeff;
                    }
                }
            }
            (value, grad)
        };

        let mut step = 1.0;
        for _ in 0..config.max_inner_iterations {
            let (value, grad) = augmented(&w);

            // Backtracking line search along the projection arc.
            let mut accepted = None;
            let mut t = step;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = project_capped_simplex(&(&w - &(&grad * t)), upper)?;
                let direction = &candidate - &w;
                let (candidate_value, _) = augmented(&candidate);
                if candidate_value <= value + ARMIJO_C * grad.dot(&direction) {
                    accepted = Some((candidate, direction));
                    break;
                }
                t /= 2.0;
            }

            let Some((next, direction)) = accepted else {
                // The line search stalled; the iterate is as good as the
                // subproblem gets at this penalty level.
                break;
            };

            let step_norm = direction.dot(&direction).sqrt();
            w = next;
            // Grow the trial step back so well-scaled problems take full steps.
            step = (t * 2.0).min(1.0);

            if step_norm <= config.step_tolerance * (1.0 + w.dot(&w).sqrt()) {
                break;
            }
        }

        let violation = constraints.max_violation(&w);
        trace!(outer, violation, penalty, "outer iteration complete");

        if violation <= config.constraint_tolerance {
            debug!(outer, violation, "solver converged");
            return Ok(w);
        }

        for (j, g) in constraints.groups().iter().enumerate() {
            multipliers[j] = (multipliers[j] + penalty * g.violation(&w)).max(0.0);
        }
        penalty = (penalty * config.penalty_growth).min(config.max_penalty);
    }

    let violation = constraints.max_violation(&w);
    if violation <= config.constraint_tolerance {
        return Ok(w);
    }
    Err(OptimizerError::NotConverged {
        message: format!(
            "group caps still violated by {violation:.2e} after {} outer iterations over {n} assets",
            config.max_outer_iterations
        ),
    })
}
