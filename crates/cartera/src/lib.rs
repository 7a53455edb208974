//! # cartera
//!
//! Fundamentals-to-portfolio construction: a six-stage pipeline from a raw
//! fundamentals table to optimized portfolio weights.
//!
//! This crate provides a unified interface to the cartera ecosystem.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `math`: Numerical kernels
//! - `screen`: Cleaning, normalization, scoring, selection
//! - `returns`: Historical return and covariance estimation
//! - `optimizer`: Constrained weight optimization
//! - `pipeline`: The staged pipeline context
//! - `cli`: The `construct` binary (CSV in, portfolio out)
//!
//! ## Example
//!
//! ```rust,ignore
//! // With default features (all components):
//! use cartera::pipeline::PipelineContext;
//! use cartera::optimizer::OptimizerConfig;
//!
//! // Or with specific features only:
//! // [dependencies]
//! // cartera = { version = "0.1", default-features = false, features = ["optimizer"] }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use cartera_primitives as primitives;

#[cfg(feature = "math")]
#[doc(inline)]
pub use cartera_math as math;

#[cfg(feature = "screen")]
#[doc(inline)]
pub use cartera_screen as screen;

#[cfg(feature = "returns")]
#[doc(inline)]
pub use cartera_returns as returns;

#[cfg(feature = "optimizer")]
#[doc(inline)]
pub use cartera_optimizer as optimizer;

#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use cartera_pipeline as pipeline;
