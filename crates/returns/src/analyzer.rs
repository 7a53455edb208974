//! End-to-end returns analysis over a set of selected assets.

use cartera_primitives::{CovarianceMatrix, Date, ReturnSeries, SelectedAsset};
use ndarray::Array1;
use tracing::{debug, warn};

use crate::{
    CovarianceDiagnostics, DailyReturnStats, DateWindow, PriceSeriesProvider, ReturnPanel,
    ReturnsError, TradingDayReport, annualized_covariance, daily_returns,
};

/// Configuration of the returns analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Calendar days of history to request, counted back from the end date.
    pub window_days: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { window_days: 365 }
    }
}

/// Everything the optimizer needs about historical returns, plus the
/// coverage diagnostics a caller may want to surface.
#[derive(Debug)]
pub struct ReturnsAnalysis {
    /// Requested price window.
    pub window: DateWindow,
    /// Aligned return panel over the assets that produced data.
    pub panel: ReturnPanel,
    /// Mean daily return per panel asset.
    pub mean_daily_returns: Array1<f64>,
    /// Mean daily return scaled by observed trading days, per panel asset.
    pub annualized_mean_returns: Array1<f64>,
    /// Descriptive statistics per panel asset.
    pub stats: Vec<DailyReturnStats>,
    /// Trading-day coverage of the panel.
    pub trading_days: TradingDayReport,
    /// Annualized covariance of the panel.
    pub covariance: CovarianceMatrix,
    /// Spectral and correlation diagnostics of the covariance.
    pub diagnostics: CovarianceDiagnostics,
    /// `(ticker, reason)` for assets dropped from the analysis.
    pub skipped: Vec<(String, String)>,
}

/// Builds return panels and covariance estimates from a price provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnsAnalyzer {
    config: AnalyzerConfig,
}

impl ReturnsAnalyzer {
    /// Create an analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Fetch, align and analyze daily returns for the selected assets.
    ///
    /// Assets whose price history cannot be fetched, comes back empty, or
    /// yields no usable returns are skipped and reported, not fatal; the
    /// analysis fails only when the window is degenerate or every asset is
    /// skipped.
    ///
    /// # Errors
    /// Returns [`ReturnsError::InvalidWindow`] for a window shorter than
    /// two days and [`ReturnsError::NoReturnsData`] when no asset survives.
    pub fn analyze(
        &self,
        assets: &[SelectedAsset],
        provider: &dyn PriceSeriesProvider,
        end: Date,
    ) -> Result<ReturnsAnalysis, ReturnsError> {
        if self.config.window_days < 2 {
            return Err(ReturnsError::InvalidWindow(format!(
                "window of {} days cannot produce a daily return",
                self.config.window_days
            )));
        }

        let window = DateWindow::trailing_days(end, self.config.window_days);
        let mut series: Vec<ReturnSeries> = Vec::with_capacity(assets.len());
        let mut skipped: Vec<(String, String)> = Vec::new();

        for asset in assets {
            let ticker = asset.symbol.as_str();
            match provider.history(ticker, asset.exchange.suffix(), window) {
                Ok(prices) => {
                    let returns = daily_returns(&prices);
                    if returns.is_empty() {
                        warn!(ticker, "price history yields no usable daily returns");
                        skipped.push((
                            ticker.to_string(),
                            "no usable daily returns".to_string(),
                        ));
                    } else {
                        debug!(ticker, observations = returns.len(), "fetched return series");
                        series.push(returns);
                    }
                }
                Err(err) => {
                    warn!(ticker, %err, "skipping asset");
                    skipped.push((ticker.to_string(), err.to_string()));
                }
            }
        }

        if series.is_empty() {
            return Err(ReturnsError::NoReturnsData { attempted: assets.len() });
        }

        let panel = ReturnPanel::from_series(&series);
        let trading_days = TradingDayReport::from_panel(&panel)
            .ok_or(ReturnsError::NoReturnsData { attempted: assets.len() })?;

        let mean_daily_returns = panel.mean_daily_returns();
        let annualized_mean_returns = &mean_daily_returns * trading_days.trading_days as f64;

        let covariance = annualized_covariance(&panel);
        let diagnostics = CovarianceDiagnostics::compute(&covariance, &panel)?;
        let stats = panel.per_asset_stats();

        Ok(ReturnsAnalysis {
            window,
            panel,
            mean_daily_returns,
            annualized_mean_returns,
            stats,
            trading_days,
            covariance,
            diagnostics,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_relative_eq;
    use cartera_primitives::{Exchange, MarketCapBucket, Symbol};

    use super::*;
    use crate::{PriceSeries, ProviderError};

    fn date(d: u32) -> Date {
        Date::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn asset(symbol: &str) -> SelectedAsset {
        SelectedAsset {
            name: symbol.to_string(),
            symbol: Symbol::new(symbol),
            exchange: Exchange::Primary,
            industry: "Test".to_string(),
            market_cap: 1_000.0,
            bucket: MarketCapBucket::Small,
            composite_score: 0.5,
            rank: 1,
        }
    }

    struct FixedProvider {
        closes: HashMap<String, Vec<(Date, f64)>>,
    }

    impl PriceSeriesProvider for FixedProvider {
        fn history(
            &self,
            symbol: &str,
            _suffix: &str,
            _window: DateWindow,
        ) -> Result<PriceSeries, ProviderError> {
            self.closes.get(symbol).map_or_else(
                || {
                    Err(ProviderError::Fetch {
                        symbol: symbol.to_string(),
                        message: "unknown ticker".to_string(),
                    })
                },
                |closes| {
                    Ok(PriceSeries { symbol: symbol.to_string(), closes: closes.clone() })
                },
            )
        }
    }

    fn provider() -> FixedProvider {
        let mut closes = HashMap::new();
        closes.insert(
            "A".to_string(),
            vec![(date(1), 100.0), (date(2), 101.0), (date(3), 99.0), (date(4), 102.0)],
        );
        closes.insert(
            "B".to_string(),
            vec![(date(1), 50.0), (date(2), 49.0), (date(3), 51.0), (date(4), 51.5)],
        );
        FixedProvider { closes }
    }

    #[test]
    fn failed_fetches_are_skipped_not_fatal() {
        let provider = FixedProvider { closes: provider().closes };
        let analyzer = ReturnsAnalyzer::new(AnalyzerConfig::default());
        let assets = vec![asset("A"), asset("MISSING"), asset("B")];

        let analysis = analyzer.analyze(&assets, &provider, date(4)).unwrap();
        assert_eq!(analysis.panel.n_assets(), 2);
        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.skipped[0].0, "MISSING");
    }

    #[test]
    fn all_failures_yield_no_returns_data() {
        let provider = FixedProvider { closes: HashMap::new() };
        let analyzer = ReturnsAnalyzer::new(AnalyzerConfig::default());

        let err = analyzer.analyze(&[asset("X"), asset("Y")], &provider, date(4)).unwrap_err();
        assert!(matches!(err, ReturnsError::NoReturnsData { attempted: 2 }));
    }

    #[test]
    fn annualized_mean_uses_observed_trading_days() {
        let provider = FixedProvider { closes: provider().closes };
        let analyzer = ReturnsAnalyzer::new(AnalyzerConfig::default());

        let analysis = analyzer.analyze(&[asset("A"), asset("B")], &provider, date(4)).unwrap();
        // Four closes give three return dates.
        assert_eq!(analysis.trading_days.trading_days, 3);
        for j in 0..2 {
            assert_relative_eq!(
                analysis.annualized_mean_returns[j],
                analysis.mean_daily_returns[j] * 3.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn degenerate_window_is_rejected() {
        let provider = FixedProvider { closes: provider().closes };
        let analyzer = ReturnsAnalyzer::new(AnalyzerConfig { window_days: 1 });

        let err = analyzer.analyze(&[asset("A")], &provider, date(4)).unwrap_err();
        assert!(matches!(err, ReturnsError::InvalidWindow(_)));
    }

    #[test]
    fn empty_price_history_counts_as_skip() {
        let mut closes = HashMap::new();
        closes.insert("A".to_string(), vec![(date(1), 100.0)]);
        closes.insert(
            "B".to_string(),
            vec![(date(1), 50.0), (date(2), 51.0), (date(3), 50.5)],
        );
        let provider = FixedProvider { closes };
        let analyzer = ReturnsAnalyzer::new(AnalyzerConfig::default());

        let analysis = analyzer.analyze(&[asset("A"), asset("B")], &provider, date(4)).unwrap();
        assert_eq!(analysis.panel.n_assets(), 1);
        assert_eq!(analysis.skipped[0].0, "A");
    }
}
