//! Numerical kernels shared by the returns analyzer and the optimizer.
//!
//! Dense operations are implemented directly on `ndarray` storage; the
//! matrices involved are small (one row/column per selected asset), so
//! plain O(n^3) algorithms with partial safeguards are sufficient and keep
//! the dependency surface flat.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stats;
pub use stats::{percentile_linear, sample_mean, sample_std};

mod covariance;
pub use covariance::{pairwise_correlation, pairwise_covariance};

mod eigen;
pub use eigen::{condition_number, is_symmetric, jacobi_eigenvalues};

mod projection;
pub use projection::project_capped_simplex;

mod error;
pub use error::MathError;
