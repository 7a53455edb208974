//! Core type definitions for the cartera portfolio construction pipeline.
//!
//! Every pipeline stage consumes an immutable snapshot built from these
//! types and produces a new one; nothing here is mutated in place after
//! construction.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::{Exchange, MID_CAP_MAX, MarketCapBucket, SMALL_CAP_MAX, SelectedAsset, Symbol};

mod report;
pub use report::{CleaningReport, SelectionSummary};

mod series;
pub use series::{CovarianceMatrix, ReturnSeries};

mod weights;
pub use weights::PortfolioWeights;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
