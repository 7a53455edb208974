//! Presentation of a solved weight vector as a portfolio.

use cartera_primitives::{MarketCapBucket, PortfolioWeights, SelectedAsset};
use ndarray::{Array1, Array2};

use crate::{
    Objective,
    objective::{portfolio_return, portfolio_volatility, sharpe_ratio},
};

/// Positions below this percentage are dropped from the holdings table.
const MIN_DISPLAY_WEIGHT_PCT: f64 = 0.01;

/// One position in the final portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Display name of the asset.
    pub name: String,
    /// Ticker in solve order.
    pub symbol: String,
    /// Weight in percent, rounded to two decimals.
    pub weight_pct: f64,
    /// Industry classification.
    pub industry: String,
    /// Market-cap bucket.
    pub bucket: MarketCapBucket,
}

/// A solved portfolio: holdings, realized metrics and group summaries.
///
/// Performance metrics are computed from the unrounded normalized weights;
/// the holdings table carries display percentages whose rounding residual
/// is folded into the largest position so they total exactly 100.
#[derive(Debug, Clone)]
pub struct Portfolio {
    /// Objective the weights were solved for.
    pub objective: Objective,
    /// Holdings above the display threshold, descending by weight.
    pub holdings: Vec<Holding>,
    /// Unrounded normalized weights over all solved assets.
    pub weights: PortfolioWeights,
    /// Expected annual return of the unrounded weights.
    pub annual_return: f64,
    /// Annual volatility of the unrounded weights.
    pub annual_volatility: f64,
    /// Sharpe ratio of the unrounded weights.
    pub sharpe_ratio: f64,
    /// Risk-free rate the Sharpe ratio used.
    pub risk_free_rate: f64,
    /// `(industry, total weight pct, holdings)` over displayed holdings.
    pub industry_summary: Vec<(String, f64, usize)>,
    /// `(bucket, total weight pct, holdings)` over displayed holdings.
    pub bucket_summary: Vec<(MarketCapBucket, f64, usize)>,
}

impl Portfolio {
    /// Sum of displayed holding percentages.
    #[must_use]
    pub fn total_weight_pct(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight_pct).sum()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Turn a raw solver iterate into a reported portfolio.
pub(crate) fn build(
    raw: &Array1<f64>,
    solve_order: &[String],
    assets: &[SelectedAsset],
    mean_returns: &Array1<f64>,
    covariance: &Array2<f64>,
    risk_free_rate: f64,
    objective: Objective,
) -> Portfolio {
    // The solver ends on the simplex; renormalize away any residual drift.
    let normalized = raw / raw.sum();

    let annual_return = portfolio_return(&normalized, mean_returns);
    let annual_volatility = portfolio_volatility(&normalized, covariance);
    let sharpe = sharpe_ratio(&normalized, mean_returns, covariance, risk_free_rate);

    // Round to display precision, then fold the residual into the largest
    // position so the table totals exactly 100.00.
    let mut pct: Vec<f64> = normalized.iter().map(|w| round2(w * 100.0)).collect();
    if let Some(largest) = (0..pct.len()).max_by(|&a, &b| pct[a].total_cmp(&pct[b])) {
        let residual = 100.0 - pct.iter().sum::<f64>();
        pct[largest] = round2(pct[largest] + residual);
    }

    let mut holdings: Vec<Holding> = solve_order
        .iter()
        .zip(&pct)
        .filter(|&(_, &p)| p > MIN_DISPLAY_WEIGHT_PCT)
        .map(|(symbol, &p)| {
            let asset = assets.iter().find(|a| a.symbol.as_str() == symbol);
            Holding {
                name: asset.map_or_else(|| symbol.clone(), |a| a.name.clone()),
                symbol: symbol.clone(),
                weight_pct: p,
                industry: asset.map_or_else(String::new, |a| a.industry.clone()),
                bucket: asset.map_or(MarketCapBucket::Small, |a| a.bucket),
            }
        })
        .collect();
    holdings.sort_by(|a, b| b.weight_pct.total_cmp(&a.weight_pct));

    let mut industry_summary: Vec<(String, f64, usize)> = Vec::new();
    for h in &holdings {
        match industry_summary.iter_mut().find(|(name, ..)| *name == h.industry) {
            Some((_, total, count)) => {
                *total = round2(*total + h.weight_pct);
                *count += 1;
            }
            None => industry_summary.push((h.industry.clone(), h.weight_pct, 1)),
        }
    }
    industry_summary.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut bucket_summary: Vec<(MarketCapBucket, f64, usize)> = Vec::new();
    for bucket in MarketCapBucket::all() {
        let members: Vec<&Holding> = holdings.iter().filter(|h| h.bucket == bucket).collect();
        if !members.is_empty() {
            let total = round2(members.iter().map(|h| h.weight_pct).sum());
            bucket_summary.push((bucket, total, members.len()));
        }
    }

    Portfolio {
        objective,
        holdings,
        weights: PortfolioWeights::new(solve_order.to_vec(), normalized),
        annual_return,
        annual_volatility,
        sharpe_ratio: sharpe,
        risk_free_rate,
        industry_summary,
        bucket_summary,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cartera_primitives::{Exchange, Symbol};
    use ndarray::array;

    use super::*;

    fn asset(symbol: &str, industry: &str, bucket: MarketCapBucket) -> SelectedAsset {
        SelectedAsset {
            name: format!("{symbol} Ltd"),
            symbol: Symbol::new(symbol),
            exchange: Exchange::Primary,
            industry: industry.to_string(),
            market_cap: 0.0,
            bucket,
            composite_score: 0.0,
            rank: 1,
        }
    }

    fn three_assets() -> Vec<SelectedAsset> {
        vec![
            asset("A", "Banks", MarketCapBucket::Large),
            asset("B", "IT", MarketCapBucket::Mid),
            asset("C", "Banks", MarketCapBucket::Small),
        ]
    }

    fn order() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn displayed_weights_total_exactly_one_hundred() {
        // Thirds round to 33.33 each; the residual 0.01 lands on one of them.
        let raw = array![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
        let mu = array![0.1, 0.1, 0.1];
        let cov = Array2::eye(3) * 0.04;

        let p = build(&raw, &order(), &three_assets(), &mu, &cov, 0.05, Objective::default());
        assert_relative_eq!(p.total_weight_pct(), 100.0, epsilon = 1e-9);
        assert_eq!(p.holdings.len(), 3);
        assert!(p.holdings.iter().any(|h| (h.weight_pct - 33.34).abs() < 1e-9));
    }

    #[test]
    fn dust_positions_are_dropped() {
        let raw = array![0.99995, 0.00005, 0.0];
        let mu = array![0.1, 0.1, 0.1];
        let cov = Array2::eye(3) * 0.04;

        let p = build(&raw, &order(), &three_assets(), &mu, &cov, 0.05, Objective::default());
        assert_eq!(p.holdings.len(), 1);
        assert_eq!(p.holdings[0].symbol, "A");
    }

    #[test]
    fn metrics_come_from_unrounded_weights() {
        let raw = array![0.6, 0.4, 0.0];
        let mu = array![0.10, 0.05, 0.20];
        let cov = array![[0.04, 0.0, 0.0], [0.0, 0.01, 0.0], [0.0, 0.0, 0.09]];

        let p = build(&raw, &order(), &three_assets(), &mu, &cov, 0.02, Objective::default());
        assert_relative_eq!(p.annual_return, 0.08, epsilon = 1e-12);
        let vol = (0.36 * 0.04 + 0.16 * 0.01_f64).sqrt();
        assert_relative_eq!(p.annual_volatility, vol, epsilon = 1e-12);
        assert_relative_eq!(p.sharpe_ratio, (0.08 - 0.02) / vol, epsilon = 1e-12);
    }

    #[test]
    fn holdings_sorted_descending() {
        let raw = array![0.2, 0.5, 0.3];
        let mu = array![0.1, 0.1, 0.1];
        let cov = Array2::eye(3) * 0.04;

        let p = build(&raw, &order(), &three_assets(), &mu, &cov, 0.05, Objective::default());
        let symbols: Vec<&str> = p.holdings.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "C", "A"]);
    }

    #[test]
    fn summaries_group_displayed_holdings() {
        let raw = array![0.5, 0.3, 0.2];
        let mu = array![0.1, 0.1, 0.1];
        let cov = Array2::eye(3) * 0.04;

        let p = build(&raw, &order(), &three_assets(), &mu, &cov, 0.05, Objective::default());

        let banks = p.industry_summary.iter().find(|(n, ..)| n == "Banks").unwrap();
        assert_relative_eq!(banks.1, 70.0, epsilon = 1e-9);
        assert_eq!(banks.2, 2);

        let mid = p.bucket_summary.iter().find(|(b, ..)| *b == MarketCapBucket::Mid).unwrap();
        assert_relative_eq!(mid.1, 30.0, epsilon = 1e-9);
        assert_eq!(mid.2, 1);
    }
}
