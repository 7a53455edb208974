//! Portfolio construction CLI.
//!
//! Runs the six-stage pipeline over a fundamentals CSV, fetching price
//! history from Yahoo Finance for the selected assets.
//!
//! Usage: `cargo run --features cli --bin construct -- DATA.csv [options]`
//!
//! Options:
//!   --percentile P        score percentile cutoff, default 80
//!   --invert COL,COL      metric columns where lower is better
//!   --objective NAME      sharpe | return | volatility, default sharpe
//!   --risk-free PCT       annual risk-free rate in percent, default 7
//!   --max-weight PCT      per-asset weight cap in percent, default 100
//!   --max-industry PCT    cap applied to every industry, default none
//!   --cap-large PCT       Large-Cap bucket cap, default none
//!   --cap-mid PCT         Mid-Cap bucket cap, default none
//!   --cap-small PCT       Small-Cap bucket cap, default none
//!   --window-days N       calendar days of price history, default 365

use std::collections::{BTreeMap, HashMap};
use std::env;

use cartera::optimizer::{Objective, OptimizerConfig};
use cartera::pipeline::PipelineContext;
use cartera::primitives::{Date, MarketCapBucket};
use cartera::returns::{
    AnalyzerConfig, DateWindow, PriceSeries, PriceSeriesProvider, ProviderError,
};
use cartera::screen::{CleanerConfig, ColumnLayout};
use polars::prelude::*;
use time::{Duration, OffsetDateTime};
use tracing::warn;
use yahoo_finance_api as yahoo;

struct Options {
    path: String,
    percentile: f64,
    invert: Vec<String>,
    objective: Objective,
    risk_free_rate: f64,
    max_stock_weight: f64,
    max_industry: Option<f64>,
    cap_large: Option<f64>,
    cap_mid: Option<f64>,
    cap_small: Option<f64>,
    window_days: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let options = match parse_options(&env::args().collect::<Vec<_>>()) {
        Some(options) => options,
        None => {
            eprintln!("Usage: construct DATA.csv [--percentile P] [--objective sharpe|return|volatility] ...");
            std::process::exit(1);
        }
    };

    let raw = LazyCsvReader::new(&options.path).with_has_header(true).finish()?.collect()?;
    println!("Loaded {} rows x {} columns from {}", raw.height(), raw.width(), options.path);

    // Stages 1-4: clean, normalize, score, select.
    let cleaner = CleanerConfig::default();
    let ctx = PipelineContext::new(raw).clean(&cleaner)?;

    let report = ctx.cleaning_report().ok_or("missing cleaning report")?;
    println!(
        "\nCleaning: {} -> {} rows ({} removed)",
        report.initial_rows, report.final_rows, report.total_removed
    );
    for (reason, count) in &report.removed {
        println!("  {reason}: {count}");
    }

    let cleaned = ctx.cleaned().ok_or("missing cleaned table")?;
    let metrics = metric_columns(cleaned, &cleaner.preserve_columns);
    if metrics.is_empty() {
        return Err("no numeric metric columns to score".into());
    }
    let weights = equal_weights(&metrics);
    println!("\nScoring {} metrics with equal weights", metrics.len());

    let ctx = ctx
        .normalize(&metrics, &options.invert)?
        .score(&metrics, &weights)?
        .select(options.percentile, &ColumnLayout::default())?;

    let summary = ctx.selection_summary().ok_or("missing selection summary")?;
    println!(
        "\nSelection: {} of {} assets above the {:.0}th percentile (cutoff {:.4})",
        summary.selected, summary.universe, summary.percentile, summary.cutoff_score
    );
    let selected = ctx.selected().ok_or("missing selected assets")?.to_vec();
    for asset in &selected {
        println!(
            "  #{:<3} {:<24} {:<12} {:>10} score {:.4}",
            asset.rank,
            asset.name,
            asset.symbol,
            asset.bucket.to_string(),
            asset.composite_score
        );
    }

    // Stage 5: fetch price history and analyze returns.
    let end = chrono::Utc::now().date_naive();
    let provider = fetch_histories(&selected, options.window_days).await?;
    let ctx = ctx.analyze(&provider, end, AnalyzerConfig { window_days: options.window_days })?;

    let analysis = ctx.analysis().ok_or("missing returns analysis")?;
    let coverage = &analysis.trading_days;
    println!(
        "\nReturns: {} assets, {} trading days over {} calendar days ({:.2} of a 252-day year)",
        analysis.panel.n_assets(),
        coverage.trading_days,
        coverage.calendar_days,
        coverage.year_fraction
    );
    println!(
        "  expected ~{} trading days; {} weekdays with no observation",
        coverage.expected_trading_days,
        coverage.missing_weekdays.len()
    );
    for (symbol, reason) in &analysis.skipped {
        println!("  skipped {symbol}: {reason}");
    }
    let diag = &analysis.diagnostics;
    println!(
        "  covariance: symmetric={} positive_definite={} condition={:.2e} corr=[{:.2}, {:.2}]",
        diag.is_symmetric,
        diag.is_positive_definite,
        diag.condition_number,
        diag.min_correlation,
        diag.max_correlation
    );
    if !diag.is_positive_definite {
        warn!("covariance matrix is not positive definite; optimization may be degenerate");
    }

    // Stage 6: optimize.
    let config = optimizer_config(&options, &selected);
    let ctx = ctx.optimize(&config)?;
    let portfolio = ctx.portfolio().ok_or("missing portfolio")?;

    println!("\nOptimized portfolio ({})", portfolio.objective.name());
    println!(
        "  annual return {:.2}%  volatility {:.2}%  sharpe {:.2}",
        portfolio.annual_return * 100.0,
        portfolio.annual_volatility * 100.0,
        portfolio.sharpe_ratio
    );
    println!("\n  {:<24} {:<12} {:>9}  {:<16} {}", "Stock", "Ticker", "Weight %", "Segment", "Bucket");
    for holding in &portfolio.holdings {
        println!(
            "  {:<24} {:<12} {:>9.2}  {:<16} {}",
            holding.name, holding.symbol, holding.weight_pct, holding.industry, holding.bucket
        );
    }
    println!("  {:<24} {:<12} {:>9.2}", "Total", "", portfolio.total_weight_pct());

    println!("\nIndustry distribution:");
    for (industry, weight, count) in &portfolio.industry_summary {
        println!("  {industry:<24} {weight:>6.2}% across {count} holding(s)");
    }
    println!("Market-cap distribution:");
    for (bucket, weight, count) in &portfolio.bucket_summary {
        println!("  {:<24} {weight:>6.2}% across {count} holding(s)", bucket.to_string());
    }

    println!("\nRun parameters:");
    for (name, value) in ctx.parameters().entries() {
        println!("  {name}: {value}");
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Option<Options> {
    let path = args.get(1).filter(|a| !a.starts_with("--"))?.clone();
    let flag = |name: &str| -> Option<&str> {
        args.iter().position(|a| a == name).and_then(|i| args.get(i + 1)).map(String::as_str)
    };
    let pct = |name: &str| flag(name).and_then(|v| v.parse::<f64>().ok());

    let objective = match flag("--objective") {
        Some("return") => Objective::MaximizeReturn,
        Some("volatility") => Objective::MinimizeVolatility,
        _ => Objective::MaximizeSharpe,
    };

    Some(Options {
        path,
        percentile: pct("--percentile").unwrap_or(80.0),
        invert: flag("--invert")
            .map(|v| v.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
        objective,
        risk_free_rate: pct("--risk-free").unwrap_or(7.0) / 100.0,
        max_stock_weight: pct("--max-weight").unwrap_or(100.0) / 100.0,
        max_industry: pct("--max-industry").map(|v| v / 100.0),
        cap_large: pct("--cap-large").map(|v| v / 100.0),
        cap_mid: pct("--cap-mid").map(|v| v / 100.0),
        cap_small: pct("--cap-small").map(|v| v / 100.0),
        window_days: flag("--window-days").and_then(|v| v.parse().ok()).unwrap_or(365),
    })
}

/// Numeric columns that are not identifiers.
fn metric_columns(df: &DataFrame, preserved: &[String]) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| {
            matches!(
                c.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::Int16
                    | DataType::Int8
                    | DataType::UInt64
                    | DataType::UInt32
                    | DataType::UInt16
                    | DataType::UInt8
            )
        })
        .map(|c| c.name().to_string())
        .filter(|name| !preserved.iter().any(|p| p == name))
        .collect()
}

/// Equal composite weights summing to 100.
fn equal_weights(columns: &[String]) -> HashMap<String, f64> {
    let each = 100.0 / columns.len() as f64;
    columns.iter().map(|c| (c.clone(), each)).collect()
}

fn optimizer_config(
    options: &Options,
    selected: &[cartera::primitives::SelectedAsset],
) -> OptimizerConfig {
    let mut industry_caps = BTreeMap::new();
    if let Some(cap) = options.max_industry {
        for asset in selected {
            industry_caps.entry(asset.industry.clone()).or_insert(cap);
        }
    }

    let mut bucket_caps = BTreeMap::new();
    if let Some(cap) = options.cap_large {
        bucket_caps.insert(MarketCapBucket::Large, cap);
    }
    if let Some(cap) = options.cap_mid {
        bucket_caps.insert(MarketCapBucket::Mid, cap);
    }
    if let Some(cap) = options.cap_small {
        bucket_caps.insert(MarketCapBucket::Small, cap);
    }

    OptimizerConfig {
        objective: options.objective,
        risk_free_rate: options.risk_free_rate,
        max_stock_weight: options.max_stock_weight,
        industry_caps,
        bucket_caps,
        ..OptimizerConfig::default()
    }
}

/// Prices fetched up front, served to the analyzer from memory.
struct PrefetchedProvider {
    closes: HashMap<String, Vec<(Date, f64)>>,
}

impl PriceSeriesProvider for PrefetchedProvider {
    fn history(
        &self,
        symbol: &str,
        _suffix: &str,
        _window: DateWindow,
    ) -> Result<PriceSeries, ProviderError> {
        match self.closes.get(symbol) {
            Some(closes) if !closes.is_empty() => {
                Ok(PriceSeries { symbol: symbol.to_string(), closes: closes.clone() })
            }
            Some(_) => Err(ProviderError::Empty { symbol: symbol.to_string() }),
            None => Err(ProviderError::Fetch {
                symbol: symbol.to_string(),
                message: "no quotes fetched".to_string(),
            }),
        }
    }
}

/// Fetch adjusted closes from Yahoo Finance for every selected asset.
async fn fetch_histories(
    selected: &[cartera::primitives::SelectedAsset],
    window_days: i64,
) -> Result<PrefetchedProvider, Box<dyn std::error::Error>> {
    let provider = yahoo::YahooConnector::new()?;
    let end_ts = OffsetDateTime::now_utc();
    let start_ts = end_ts - Duration::days(window_days);

    let mut closes: HashMap<String, Vec<(Date, f64)>> = HashMap::new();
    print!("Fetching price history for {} assets", selected.len());

    for asset in selected {
        let ticker = format!("{}{}", asset.symbol, asset.exchange.suffix());
        match provider.get_quote_history(&ticker, start_ts, end_ts).await {
            Ok(response) => {
                let quotes = match response.quotes() {
                    Ok(quotes) => quotes,
                    Err(err) => {
                        warn!(ticker = %ticker, %err, "malformed quote response");
                        continue;
                    }
                };
                let mut series: Vec<(Date, f64)> = quotes
                    .iter()
                    .filter_map(|q| {
                        chrono::DateTime::from_timestamp(q.timestamp, 0)
                            .map(|dt| (dt.date_naive(), q.adjclose))
                    })
                    .collect();
                series.sort_by_key(|(date, _)| *date);
                series.dedup_by_key(|(date, _)| *date);
                closes.insert(asset.symbol.as_str().to_string(), series);
                print!(".");
            }
            Err(err) => {
                warn!(ticker = %ticker, %err, "quote fetch failed");
            }
        }
    }
    println!(" done ({} fetched)", closes.len());

    Ok(PrefetchedProvider { closes })
}
