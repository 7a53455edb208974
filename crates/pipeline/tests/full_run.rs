//! End-to-end pipeline run over an in-memory universe.

use std::collections::{BTreeMap, HashMap};

use approx::assert_relative_eq;
use cartera_optimizer::{Objective, OptimizerConfig};
use cartera_pipeline::{PipelineContext, PipelineError};
use cartera_primitives::{Date, MarketCapBucket};
use cartera_returns::{AnalyzerConfig, DateWindow, PriceSeries, PriceSeriesProvider, ProviderError};
use cartera_screen::{CleanerConfig, ColumnLayout};
use polars::df;
use polars::prelude::DataFrame;

/// Deterministic price provider: each ticker gets a distinct drift and
/// wobble so covariance is well conditioned.
struct SyntheticProvider;

impl PriceSeriesProvider for SyntheticProvider {
    fn history(
        &self,
        symbol: &str,
        _suffix: &str,
        window: DateWindow,
    ) -> Result<PriceSeries, ProviderError> {
        if symbol == "FAILS" {
            return Err(ProviderError::Fetch {
                symbol: symbol.to_string(),
                message: "synthetic outage".to_string(),
            });
        }

        let seed = symbol.bytes().map(u64::from).sum::<u64>();
        let drift = 0.0002 + (seed % 7) as f64 * 0.0001;
        let mut closes = Vec::new();
        let mut price = 100.0 + (seed % 50) as f64;
        let mut day = window.start;
        let mut t = 0_u64;
        while day <= window.end {
            let wobble = (((seed.wrapping_mul(31).wrapping_add(t * 17)) % 1000) as f64 / 1000.0
                - 0.5)
                * 0.02;
            price *= 1.0 + drift + wobble;
            closes.push((day, price));
            day = day.succ_opt().unwrap();
            t += 1;
        }
        Ok(PriceSeries { symbol: symbol.to_string(), closes })
    }
}

fn universe() -> DataFrame {
    df! {
        "name" => ["Alpha", "Beta", "Gamma", "Delta", "Echo", "Foxtrot", "Golf", "Hotel"],
        "primary_code" => ["ALPHA", "BETA", "", "DELTA", "ECHO", "FAILS", "GOLF", "HOTEL"],
        "secondary_code" => ["", "", "500100", "", "", "", "", ""],
        "isin" => ["I1", "I2", "I3", "I4", "I5", "I6", "I7", "I8"],
        "industry" => ["Banks", "IT", "Banks", "Pharma", "IT", "Autos", "Pharma", "Banks"],
        "market_cap" => [1_200.0, 45_000.0, 150_000.0, 30_000.0, 95_000.0, 2_500.0, 60_000.0, 500_000.0],
        "roe" => [0.22, 0.18, 0.15, 0.30, 0.12, 0.25, 0.20, 0.10],
        "pe" => [12.0, 25.0, 18.0, 9.0, 30.0, 15.0, 11.0, 40.0],
    }
    .unwrap()
}

fn metric_columns() -> Vec<String> {
    vec!["roe".to_string(), "pe".to_string()]
}

fn metric_weights() -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    weights.insert("roe".to_string(), 60.0);
    weights.insert("pe".to_string(), 40.0);
    weights
}

fn run_through_selection(percentile: f64) -> PipelineContext {
    let columns = metric_columns();
    PipelineContext::new(universe())
        .clean(&CleanerConfig::default())
        .unwrap()
        .normalize(&columns, &["pe".to_string()])
        .unwrap()
        .score(&columns, &metric_weights())
        .unwrap()
        .select(percentile, &ColumnLayout::default())
        .unwrap()
}

#[test]
fn full_run_produces_a_feasible_portfolio() {
    let end = Date::from_ymd_opt(2024, 6, 28).unwrap();
    let ctx = run_through_selection(25.0)
        .analyze(&SyntheticProvider, end, AnalyzerConfig::default())
        .unwrap();

    let analysis = ctx.analysis().unwrap();
    assert!(analysis.panel.n_assets() >= 2);
    assert!(analysis.diagnostics.is_symmetric);

    let mut bucket_caps = BTreeMap::new();
    bucket_caps.insert(MarketCapBucket::Large, 0.6);
    let config = OptimizerConfig {
        objective: Objective::MinimizeVolatility,
        max_stock_weight: 0.5,
        bucket_caps,
        ..OptimizerConfig::default()
    };
    let ctx = ctx.optimize(&config).unwrap();

    let portfolio = ctx.portfolio().unwrap();
    assert_relative_eq!(portfolio.total_weight_pct(), 100.0, epsilon = 1e-9);
    for holding in &portfolio.holdings {
        assert!(holding.weight_pct <= 50.0 + 0.01, "holding above per-asset cap");
    }
    let large: f64 = portfolio
        .holdings
        .iter()
        .filter(|h| h.bucket == MarketCapBucket::Large)
        .map(|h| h.weight_pct)
        .sum();
    assert!(large <= 60.0 + 0.01, "large-cap exposure {large} above cap");
    assert!(portfolio.annual_volatility > 0.0);

    // The parameter log captures what the run was configured with.
    let names: Vec<&str> =
        ctx.parameters().entries().iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"Selection Percentile"));
    assert!(names.contains(&"Optimization Objective"));
    assert!(names.contains(&"Max Large-Cap Weight (%)"));
}

#[test]
fn fetch_failures_are_skipped_and_reported() {
    let end = Date::from_ymd_opt(2024, 6, 28).unwrap();
    // Percentile 1 keeps almost the whole universe, including FAILS.
    let ctx = run_through_selection(1.0)
        .analyze(&SyntheticProvider, end, AnalyzerConfig::default())
        .unwrap();

    let analysis = ctx.analysis().unwrap();
    assert!(analysis.skipped.iter().any(|(symbol, _)| symbol == "FAILS"));
    assert!(analysis.panel.symbols().iter().all(|s| s != "FAILS"));
}

#[test]
fn selected_assets_strictly_beat_the_cutoff() {
    let ctx = run_through_selection(50.0);
    let summary = ctx.selection_summary().unwrap();
    for asset in ctx.selected().unwrap() {
        assert!(asset.composite_score > summary.cutoff_score);
    }
    assert_eq!(summary.selected, ctx.selected().unwrap().len());
}

#[test]
fn optimize_before_analyze_is_not_ready() {
    let ctx = run_through_selection(25.0);
    let err = ctx.optimize(&OptimizerConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::StageNotReady { .. }));
    assert!(err.is_recoverable());
}
