//! Daily simple returns and the aligned return panel.

use cartera_math::{percentile_linear, sample_mean, sample_std};
use cartera_primitives::{Date, ReturnSeries};
use ndarray::{Array1, Array2};

use crate::PriceSeries;

/// Convert an adjusted-close series into daily simple returns.
///
/// A return is emitted for each consecutive pair of observations with a
/// finite, strictly positive previous close, as `(p_t - p_{t-1}) / p_{t-1}`.
/// Gaps in the price history produce returns over the gap, matching how a
/// position would actually have moved.
#[must_use]
pub fn daily_returns(prices: &PriceSeries) -> ReturnSeries {
    let mut observations = Vec::with_capacity(prices.closes.len().saturating_sub(1));

    for pair in prices.closes.windows(2) {
        let (_, prev) = pair[0];
        let (date, curr) = pair[1];
        if prev.is_finite() && prev > 0.0 && curr.is_finite() {
            observations.push((date, (curr - prev) / prev));
        }
    }

    ReturnSeries::new(prices.symbol.clone(), observations)
}

/// Return observations for several assets aligned on the union of dates.
///
/// Rows are dates (ascending), columns are assets in input order. A cell is
/// `NaN` on dates where the asset has no observation; downstream estimators
/// treat `NaN` as "not observed", never as zero.
#[derive(Debug, Clone)]
pub struct ReturnPanel {
    dates: Vec<Date>,
    symbols: Vec<String>,
    values: Array2<f64>,
}

impl ReturnPanel {
    /// Align return series on the union of their observation dates.
    ///
    /// Empty input series are kept as all-`NaN` columns so panel column
    /// order always matches the input order.
    #[must_use]
    pub fn from_series(series: &[ReturnSeries]) -> Self {
        let mut dates: Vec<Date> =
            series.iter().flat_map(|s| s.observations.iter().map(|(d, _)| *d)).collect();
        dates.sort_unstable();
        dates.dedup();

        let mut values = Array2::from_elem((dates.len(), series.len()), f64::NAN);
        for (j, s) in series.iter().enumerate() {
            for (date, ret) in &s.observations {
                // Union of sorted-deduped dates always contains each one.
                if let Ok(t) = dates.binary_search(date) {
                    values[[t, j]] = *ret;
                }
            }
        }

        let symbols = series.iter().map(|s| s.symbol.clone()).collect();
        Self { dates, symbols, values }
    }

    /// Observation dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Asset symbols in column order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Raw `dates x assets` values with `NaN` gaps.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of distinct observation dates.
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of assets.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Per-asset mean of observed daily returns; 0 for an all-gap column.
    #[must_use]
    pub fn mean_daily_returns(&self) -> Array1<f64> {
        Array1::from_iter((0..self.n_assets()).map(|j| {
            let observed: Vec<f64> =
                self.values.column(j).iter().copied().filter(|v| v.is_finite()).collect();
            sample_mean(&observed)
        }))
    }

    /// Descriptive statistics per asset over observed returns only.
    #[must_use]
    pub fn per_asset_stats(&self) -> Vec<DailyReturnStats> {
        (0..self.n_assets())
            .map(|j| {
                let observed: Vec<f64> =
                    self.values.column(j).iter().copied().filter(|v| v.is_finite()).collect();
                DailyReturnStats::from_observations(self.symbols[j].clone(), &observed)
            })
            .collect()
    }
}

/// Descriptive statistics of one asset's observed daily returns.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReturnStats {
    /// Asset symbol.
    pub symbol: String,
    /// Number of observed returns.
    pub observations: usize,
    /// Mean daily return.
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    /// Minimum observed return.
    pub min: f64,
    /// First quartile.
    pub q25: f64,
    /// Third quartile.
    pub q75: f64,
    /// Maximum observed return.
    pub max: f64,
}

impl DailyReturnStats {
    fn from_observations(symbol: String, observed: &[f64]) -> Self {
        let quartile = |p: f64| percentile_linear(observed, p).unwrap_or(f64::NAN);
        Self {
            symbol,
            observations: observed.len(),
            mean: sample_mean(observed),
            std: sample_std(observed),
            min: observed.iter().copied().fold(f64::INFINITY, f64::min),
            q25: quartile(25.0),
            q75: quartile(75.0),
            max: observed.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
