//! Constrained portfolio weight optimization.
//!
//! The optimizer minimizes one of three classical mean-variance objectives
//! over the capped simplex (full investment, long-only, per-asset weight
//! cap) with group exposure caps on industries and market-cap buckets.
//! Group caps are handled with an augmented Lagrangian outer loop; each
//! inner subproblem is solved by projected gradient descent, so the budget
//! and box constraints hold exactly at every iterate.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod objective;
pub use objective::Objective;

mod constraints;
pub use constraints::{ConstraintSet, GroupConstraint};

mod solver;
pub use solver::{SolverConfig, solve};

mod portfolio;
pub use portfolio::{Holding, Portfolio};

mod optimizer;
pub use optimizer::{OptimizerConfig, PortfolioOptimizer};

mod error;
pub use error::OptimizerError;
