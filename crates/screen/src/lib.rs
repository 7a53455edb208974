//! Fundamentals screening: cleaning, normalization, composite scoring and
//! percentile selection over polars DataFrames.
//!
//! Each operation takes a frame by reference and returns a new frame (or
//! typed rows); upstream frames are never mutated, so before/after
//! comparison is always possible.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod clean;
pub use clean::{CleanerConfig, clean};

mod normalize;
pub use normalize::normalize;

mod score;
pub use score::{COMPOSITE_SCORE, RANK, composite_scores, validate_weights};

mod select;
pub use select::{ColumnLayout, select};

mod error;
pub use error::ScreenError;
