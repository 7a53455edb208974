//! Historical return estimation for selected assets.
//!
//! Price series are fetched through the [`PriceSeriesProvider`] trait so
//! the analyzer itself never touches the network; daily simple returns are
//! aligned on the union of observed dates into a gapped panel, and the
//! covariance of that panel is annualized by the number of trading days it
//! actually covers.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod provider;
pub use provider::{DateWindow, PriceSeries, PriceSeriesProvider, ProviderError};

mod daily;
pub use daily::{DailyReturnStats, ReturnPanel, daily_returns};

mod trading_days;
pub use trading_days::TradingDayReport;

mod covariance;
pub use covariance::{CovarianceDiagnostics, annualized_covariance};

mod analyzer;
pub use analyzer::{AnalyzerConfig, ReturnsAnalysis, ReturnsAnalyzer};

mod error;
pub use error::ReturnsError;
